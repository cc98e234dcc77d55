use crate::domain::label::{EdgeKind, Label};
use crate::domain::node::{Edge, Node, NodeFilter, NodeRef, Properties, Related};
use crate::domain::relation::Relation;
use anyhow::Result;

/// Interface the resolvers use to read and write the social graph.
/// Both Neo4jStore and MemoryStore implement this.
#[async_trait::async_trait]
pub trait GraphStore: Send + Sync {
    /// Find the User, Post or Comment carrying `id`
    async fn resolve(&self, id: &str) -> Result<Option<NodeRef>>;

    /// Load one node
    async fn find_node(&self, label: Label, id: &str) -> Result<Option<Node>>;

    /// List nodes of a label matching a filter, in creation order
    async fn find_nodes(&self, label: Label, filter: &NodeFilter) -> Result<Vec<Node>>;

    /// Create a node; `properties` must carry an `id`
    async fn create_node(&self, label: Label, properties: Properties) -> Result<Node>;

    /// Get-or-create a node by id; `properties` only apply on create
    async fn merge_node(&self, label: Label, id: &str, properties: Properties) -> Result<Node>;

    /// Overwrite the given properties; returns None if the node is missing
    async fn update_node(
        &self,
        label: Label,
        id: &str,
        properties: Properties,
    ) -> Result<Option<Node>>;

    /// Idempotently create an edge identified by its endpoints, kind and `key`
    /// properties. Returns None when either endpoint is missing.
    async fn merge_edge(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        to: &NodeRef,
        key: Properties,
    ) -> Result<Option<Edge>>;

    /// Delete the edges matching endpoints, kind and `key`; returns the
    /// first removed edge, if any
    async fn delete_edge(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        to: &NodeRef,
        key: Properties,
    ) -> Result<Option<Edge>>;

    /// Replace every outgoing `kind` edge of `from` with edges to `targets`
    async fn replace_edges(&self, from: &NodeRef, kind: EdgeKind, targets: &[NodeRef])
        -> Result<()>;

    /// Flip `disabled` and point the DISABLED edge at the moderator in one
    /// step. Enabling returns false when the node was not disabled.
    async fn set_disabled(&self, target: &NodeRef, moderator_id: &str, disabled: bool)
        -> Result<bool>;

    /// Has-many traversal
    async fn related(&self, from: &NodeRef, relation: &Relation) -> Result<Vec<Related>>;

    /// Has-one traversal
    async fn related_one(&self, from: &NodeRef, relation: &Relation) -> Result<Option<Related>>;

    /// Count traversal
    async fn count_related(&self, from: &NodeRef, relation: &Relation) -> Result<i64>;

    /// Boolean traversal: is `other_id` reachable through the relation
    async fn is_related(&self, from: &NodeRef, relation: &Relation, other_id: &str)
        -> Result<bool>;

    /// Health check (optional)
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
