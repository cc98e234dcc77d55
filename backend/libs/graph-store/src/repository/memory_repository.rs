//! In-process graph store
//!
//! Keeps nodes and edges behind a single `RwLock`. Every trait call takes the
//! lock once, so each call is atomic just like a single Cypher statement.

use super::GraphStore;
use crate::domain::label::{Direction, EdgeKind, Label};
use crate::domain::node::{Edge, Node, NodeFilter, NodeRef, Properties, Related};
use crate::domain::relation::Relation;
use anyhow::{anyhow, Result};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl MemoryGraph {
    fn node(&self, label: Label, id: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|node| node.label == label && node.id() == id)
    }

    fn node_mut(&mut self, label: Label, id: &str) -> Option<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|node| node.label == label && node.id() == id)
    }

    fn contains(&self, node: &NodeRef) -> bool {
        self.node(node.label, &node.id).is_some()
    }

    fn written_by_any(&self, node: &Node, authors: &[String]) -> bool {
        self.edges.iter().any(|edge| {
            edge.kind == EdgeKind::Wrote
                && edge.to.label == node.label
                && edge.to.id == node.id()
                && authors.contains(&edge.from.id)
        })
    }

    fn traverse(&self, from: &NodeRef, relation: &Relation) -> Vec<Related> {
        if !self.contains(from) {
            return Vec::new();
        }

        self.edges
            .iter()
            .filter(|edge| edge.kind == relation.edge)
            .filter_map(|edge| {
                let other = match relation.direction {
                    Direction::Outgoing if edge.from == *from => &edge.to,
                    Direction::Incoming if edge.to == *from => &edge.from,
                    _ => return None,
                };
                if other.label != relation.target {
                    return None;
                }
                let node = self.node(other.label, &other.id)?;
                if relation.active_only && !node.is_active() {
                    return None;
                }
                Some(Related {
                    node: node.clone(),
                    edge: edge.clone(),
                })
            })
            .collect()
    }
}

fn new_edge(from: &NodeRef, kind: EdgeKind, to: &NodeRef, key: Properties) -> Edge {
    let mut properties = key;
    properties.insert(
        "createdAt".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );
    Edge {
        kind,
        from: from.clone(),
        to: to.clone(),
        properties,
    }
}

/// Graph store kept entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    graph: RwLock<MemoryGraph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored edges of a kind, for assertions in tests
    pub async fn edge_count(&self, kind: EdgeKind) -> usize {
        let graph = self.graph.read().await;
        graph.edges.iter().filter(|edge| edge.kind == kind).count()
    }

    /// All edges of a kind leaving `from`
    pub async fn edges_from(&self, from: &NodeRef, kind: EdgeKind) -> Vec<Edge> {
        let graph = self.graph.read().await;
        graph
            .edges
            .iter()
            .filter(|edge| edge.kind == kind && edge.from == *from)
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl GraphStore for MemoryStore {
    async fn resolve(&self, id: &str) -> Result<Option<NodeRef>> {
        let graph = self.graph.read().await;
        Ok(graph
            .nodes
            .iter()
            .find(|node| node.id() == id && Label::RESOURCES.contains(&node.label))
            .map(Node::node_ref))
    }

    async fn find_node(&self, label: Label, id: &str) -> Result<Option<Node>> {
        let graph = self.graph.read().await;
        Ok(graph.node(label, id).cloned())
    }

    async fn find_nodes(&self, label: Label, filter: &NodeFilter) -> Result<Vec<Node>> {
        let graph = self.graph.read().await;
        Ok(graph
            .nodes
            .iter()
            .filter(|node| node.label == label && filter.matches(node))
            .filter(|node| {
                filter.exclude_authors.is_empty()
                    || !graph.written_by_any(node, &filter.exclude_authors)
            })
            .cloned()
            .collect())
    }

    async fn create_node(&self, label: Label, properties: Properties) -> Result<Node> {
        let node = Node::new(label, properties);
        if node.id().is_empty() {
            return Err(anyhow!("Cannot create {} node without an id", label));
        }

        let mut graph = self.graph.write().await;
        if graph.node(label, node.id()).is_some() {
            return Err(anyhow!("{} node {} already exists", label, node.id()));
        }
        graph.nodes.push(node.clone());

        debug!("Created {} node {}", label, node.id());
        Ok(node)
    }

    async fn merge_node(&self, label: Label, id: &str, properties: Properties) -> Result<Node> {
        let mut graph = self.graph.write().await;
        if let Some(existing) = graph.node(label, id) {
            return Ok(existing.clone());
        }

        let mut properties = properties;
        properties.insert("id".to_string(), Value::String(id.to_string()));
        let node = Node::new(label, properties);
        graph.nodes.push(node.clone());
        Ok(node)
    }

    async fn update_node(
        &self,
        label: Label,
        id: &str,
        properties: Properties,
    ) -> Result<Option<Node>> {
        let mut graph = self.graph.write().await;
        let Some(node) = graph.node_mut(label, id) else {
            return Ok(None);
        };
        for (key, value) in properties {
            if key != "id" {
                node.properties.insert(key, value);
            }
        }
        Ok(Some(node.clone()))
    }

    async fn merge_edge(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        to: &NodeRef,
        key: Properties,
    ) -> Result<Option<Edge>> {
        let mut graph = self.graph.write().await;
        if !graph.contains(from) || !graph.contains(to) {
            return Ok(None);
        }

        if let Some(existing) = graph.edges.iter().find(|edge| {
            edge.kind == kind && edge.from == *from && edge.to == *to && edge.matches_key(&key)
        }) {
            return Ok(Some(existing.clone()));
        }

        let edge = new_edge(from, kind, to, key);
        graph.edges.push(edge.clone());
        debug!("Merged {}: {} -> {}", kind, from.id, to.id);
        Ok(Some(edge))
    }

    async fn delete_edge(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        to: &NodeRef,
        key: Properties,
    ) -> Result<Option<Edge>> {
        let mut graph = self.graph.write().await;
        let mut removed = None;
        graph.edges.retain(|edge| {
            let matches = edge.kind == kind
                && edge.from == *from
                && edge.to == *to
                && edge.matches_key(&key);
            if matches && removed.is_none() {
                removed = Some(edge.clone());
            }
            !matches
        });
        Ok(removed)
    }

    async fn replace_edges(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        targets: &[NodeRef],
    ) -> Result<()> {
        let mut graph = self.graph.write().await;
        graph
            .edges
            .retain(|edge| !(edge.kind == kind && edge.from == *from));

        if !graph.contains(from) {
            return Ok(());
        }
        for target in targets {
            let already = graph
                .edges
                .iter()
                .any(|edge| edge.kind == kind && edge.from == *from && edge.to == *target);
            if graph.contains(target) && !already {
                let edge = new_edge(from, kind, target, Properties::new());
                graph.edges.push(edge);
            }
        }
        Ok(())
    }

    async fn set_disabled(
        &self,
        target: &NodeRef,
        moderator_id: &str,
        disabled: bool,
    ) -> Result<bool> {
        let mut graph = self.graph.write().await;
        let moderator = NodeRef::user(moderator_id);
        if !graph.contains(target) {
            return Ok(false);
        }

        let was_disabled = graph
            .edges
            .iter()
            .any(|edge| edge.kind == EdgeKind::Disabled && edge.to == *target)
            || graph
                .node(target.label, &target.id)
                .is_some_and(|node| node.flag("disabled"));

        if disabled {
            if !graph.contains(&moderator) {
                return Ok(false);
            }
            graph
                .edges
                .retain(|edge| !(edge.kind == EdgeKind::Disabled && edge.to == *target));
            let edge = new_edge(&moderator, EdgeKind::Disabled, target, Properties::new());
            graph.edges.push(edge);
        } else {
            if !was_disabled {
                return Ok(false);
            }
            graph
                .edges
                .retain(|edge| !(edge.kind == EdgeKind::Disabled && edge.to == *target));
        }

        if let Some(node) = graph.node_mut(target.label, &target.id) {
            node.properties
                .insert("disabled".to_string(), Value::Bool(disabled));
        }
        Ok(true)
    }

    async fn related(&self, from: &NodeRef, relation: &Relation) -> Result<Vec<Related>> {
        let graph = self.graph.read().await;
        Ok(graph.traverse(from, relation))
    }

    async fn related_one(&self, from: &NodeRef, relation: &Relation) -> Result<Option<Related>> {
        let graph = self.graph.read().await;
        Ok(graph.traverse(from, relation).pop())
    }

    async fn count_related(&self, from: &NodeRef, relation: &Relation) -> Result<i64> {
        let graph = self.graph.read().await;
        Ok(graph.traverse(from, relation).len() as i64)
    }

    async fn is_related(
        &self,
        from: &NodeRef,
        relation: &Relation,
        other_id: &str,
    ) -> Result<bool> {
        let graph = self.graph.read().await;
        Ok(graph
            .traverse(from, relation)
            .iter()
            .any(|related| related.node.id() == other_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_node(Label::User, props! { "id" => "u1", "name" => "Owner" })
            .await
            .unwrap();
        store
            .create_node(Label::User, props! { "id" => "u2", "name" => "Moderator" })
            .await
            .unwrap();
        store
            .create_node(Label::Post, props! { "id" => "p1", "title" => "Hello" })
            .await
            .unwrap();
        store
            .merge_edge(
                &NodeRef::user("u1"),
                EdgeKind::Wrote,
                &NodeRef::post("p1"),
                Properties::new(),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_node_rejects_duplicate_id() {
        let store = seeded().await;
        let result = store
            .create_node(Label::Post, props! { "id" => "p1" })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_merge_edge_is_idempotent_per_key() {
        let store = seeded().await;
        let user = NodeRef::user("u2");
        let post = NodeRef::post("p1");

        for _ in 0..2 {
            store
                .merge_edge(&user, EdgeKind::Emoted, &post, props! { "emotion" => "happy" })
                .await
                .unwrap();
        }
        store
            .merge_edge(&user, EdgeKind::Emoted, &post, props! { "emotion" => "cry" })
            .await
            .unwrap();

        assert_eq!(store.edge_count(EdgeKind::Emoted).await, 2);
    }

    #[tokio::test]
    async fn test_merge_edge_to_missing_node_returns_none() {
        let store = seeded().await;
        let edge = store
            .merge_edge(
                &NodeRef::user("u1"),
                EdgeKind::Shouted,
                &NodeRef::post("missing"),
                Properties::new(),
            )
            .await
            .unwrap();
        assert!(edge.is_none());
    }

    #[tokio::test]
    async fn test_relation_traversal_shapes() {
        let store = seeded().await;
        let author = Relation::incoming(EdgeKind::Wrote, Label::User);
        let post = NodeRef::post("p1");

        let one = store.related_one(&post, &author).await.unwrap().unwrap();
        assert_eq!(one.node.id(), "u1");
        assert_eq!(store.count_related(&post, &author).await.unwrap(), 1);
        assert!(store.is_related(&post, &author, "u1").await.unwrap());
        assert!(!store.is_related(&post, &author, "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_disabled_toggles_flag_and_edge() {
        let store = seeded().await;
        let post = NodeRef::post("p1");
        let disabled_by = Relation::incoming(EdgeKind::Disabled, Label::User);

        assert!(!store.set_disabled(&post, "u2", false).await.unwrap());
        assert!(store.set_disabled(&post, "u2", true).await.unwrap());

        let node = store.find_node(Label::Post, "p1").await.unwrap().unwrap();
        assert!(node.flag("disabled"));
        let moderator = store.related_one(&post, &disabled_by).await.unwrap().unwrap();
        assert_eq!(moderator.node.id(), "u2");

        assert!(store.set_disabled(&post, "u2", false).await.unwrap());
        let node = store.find_node(Label::Post, "p1").await.unwrap().unwrap();
        assert!(!node.flag("disabled"));
        assert!(store.related_one(&post, &disabled_by).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_nodes_excludes_authors() {
        let store = seeded().await;
        let filter = NodeFilter::default().excluding_authors(vec!["u1".to_string()]);
        let posts = store.find_nodes(Label::Post, &filter).await.unwrap();
        assert!(posts.is_empty());

        let posts = store
            .find_nodes(Label::Post, &NodeFilter::default())
            .await
            .unwrap();
        assert_eq!(posts.len(), 1);
    }
}
