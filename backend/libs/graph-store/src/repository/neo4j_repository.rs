use super::GraphStore;
use crate::domain::label::{Direction, EdgeKind, Label};
use crate::domain::node::{Edge, Node, NodeFilter, NodeRef, Properties, Related};
use crate::domain::relation::Relation;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use neo4rs::{query, BoltList, BoltMap, BoltNull, BoltString, BoltType, Graph, Query, Row};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Graph store backed by Neo4j
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Arc<Graph>,
}

impl Neo4jStore {
    pub fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password).context("Failed to connect to Neo4j")?;

        Ok(Self {
            graph: Arc::new(graph),
        })
    }

    async fn fetch(&self, q: Query) -> Result<Vec<Row>> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    async fn fetch_node(&self, label: Label, q: Query, context: &str) -> Result<Option<Node>> {
        let rows = self
            .fetch(q)
            .await
            .with_context(|| context.to_string())?;
        rows.first()
            .map(|row| node_from_row(label, row, "node"))
            .transpose()
    }

    async fn traverse(
        &self,
        from: &NodeRef,
        relation: &Relation,
        cypher: String,
    ) -> Result<Vec<Related>> {
        let rows = self
            .fetch(query(&cypher).param("id", from.id.as_str()))
            .await
            .with_context(|| format!("Failed to traverse {} from {}", relation.edge, from.id))?;

        rows.iter()
            .map(|row| {
                let node = node_from_row(relation.target, row, "node")?;
                let properties: Properties = row.get("edge").context("Missing edge column")?;
                let other = node.node_ref();
                let (edge_from, edge_to) = match relation.direction {
                    Direction::Outgoing => (from.clone(), other),
                    Direction::Incoming => (other, from.clone()),
                };
                Ok(Related {
                    node,
                    edge: Edge {
                        kind: relation.edge,
                        from: edge_from,
                        to: edge_to,
                        properties,
                    },
                })
            })
            .collect()
    }
}

fn node_from_row(label: Label, row: &Row, column: &str) -> Result<Node> {
    let properties: Properties = row
        .get(column)
        .with_context(|| format!("Missing {} column for {} node", column, label))?;
    Ok(Node::new(label, properties))
}

/// Property keys are spliced into Cypher, so only plain identifiers pass
fn checked_key(key: &str) -> Result<&str> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(key)
    } else {
        Err(anyhow!("Invalid property key: {:?}", key))
    }
}

/// `{emotion: $key_emotion}` for MERGE/MATCH on edge key properties
fn key_literal(key: &Properties) -> Result<String> {
    if key.is_empty() {
        return Ok(String::new());
    }
    let fields = key
        .keys()
        .map(|name| checked_key(name).map(|name| format!("{}: $key_{}", name, name)))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(" {{{}}}", fields.join(", ")))
}

fn bind_key(mut q: Query, key: &Properties) -> Query {
    for (name, value) in key {
        q = q.param(&format!("key_{}", name), to_bolt(value));
    }
    q
}

fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(to_bolt(item));
            }
            BoltType::List(list)
        }
        Value::Object(map) => BoltType::Map(to_bolt_map(map)),
    }
}

fn to_bolt_map(properties: &Properties) -> BoltMap {
    let mut map = BoltMap::new();
    for (key, value) in properties {
        map.put(BoltString::from(key.as_str()), to_bolt(value));
    }
    map
}

#[async_trait::async_trait]
impl GraphStore for Neo4jStore {
    async fn resolve(&self, id: &str) -> Result<Option<NodeRef>> {
        let rows = self
            .fetch(
                query(
                    "MATCH (n {id: $id}) WHERE n:User OR n:Post OR n:Comment \
                     RETURN labels(n) AS labels LIMIT 1",
                )
                .param("id", id),
            )
            .await
            .context("Failed to resolve node label")?;

        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let labels: Vec<String> = row.get("labels").context("Missing labels column")?;
        Ok(labels
            .iter()
            .filter_map(|label| label.parse::<Label>().ok())
            .find(|label| Label::RESOURCES.contains(label))
            .map(|label| NodeRef::new(label, id)))
    }

    async fn find_node(&self, label: Label, id: &str) -> Result<Option<Node>> {
        let cypher = format!("MATCH (n:{} {{id: $id}}) RETURN properties(n) AS node", label);
        self.fetch_node(
            label,
            query(&cypher).param("id", id),
            "Failed to load node",
        )
        .await
    }

    async fn find_nodes(&self, label: Label, filter: &NodeFilter) -> Result<Vec<Node>> {
        let mut conditions = Vec::new();
        for (index, (key, value)) in filter.properties.iter().enumerate() {
            let key = checked_key(key)?;
            if *value == Value::Bool(false) {
                conditions.push(format!("coalesce(n.{}, false) = $p{}", key, index));
            } else {
                conditions.push(format!("n.{} = $p{}", key, index));
            }
        }
        if !filter.exclude_authors.is_empty() {
            conditions.push(
                "NOT any(author IN [(n)<-[:WROTE]-(a:User) | a.id] WHERE author IN $excluded)"
                    .to_string(),
            );
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let cypher = format!(
            "MATCH (n:{}){} RETURN properties(n) AS node ORDER BY n.createdAt, n.id",
            label, where_clause
        );

        let excluded = Value::from(filter.exclude_authors.clone());
        let mut q = query(&cypher).param("excluded", to_bolt(&excluded));
        for (index, value) in filter.properties.values().enumerate() {
            q = q.param(&format!("p{}", index), to_bolt(value));
        }

        let rows = self.fetch(q).await.context("Failed to list nodes")?;
        rows.iter()
            .map(|row| node_from_row(label, row, "node"))
            .collect()
    }

    async fn create_node(&self, label: Label, properties: Properties) -> Result<Node> {
        let cypher = format!("CREATE (n:{}) SET n = $props RETURN properties(n) AS node", label);
        let node = self
            .fetch_node(
                label,
                query(&cypher).param("props", BoltType::Map(to_bolt_map(&properties))),
                "Failed to create node",
            )
            .await?
            .ok_or_else(|| anyhow!("CREATE returned no {} node", label))?;

        debug!("Created {} node {}", label, node.id());
        Ok(node)
    }

    async fn merge_node(&self, label: Label, id: &str, properties: Properties) -> Result<Node> {
        let cypher = format!(
            "MERGE (n:{} {{id: $id}}) ON CREATE SET n += $props RETURN properties(n) AS node",
            label
        );
        self.fetch_node(
            label,
            query(&cypher)
                .param("id", id)
                .param("props", BoltType::Map(to_bolt_map(&properties))),
            "Failed to merge node",
        )
        .await?
        .ok_or_else(|| anyhow!("MERGE returned no {} node", label))
    }

    async fn update_node(
        &self,
        label: Label,
        id: &str,
        properties: Properties,
    ) -> Result<Option<Node>> {
        let mut properties = properties;
        properties.remove("id");
        let cypher = format!(
            "MATCH (n:{} {{id: $id}}) SET n += $props RETURN properties(n) AS node",
            label
        );
        self.fetch_node(
            label,
            query(&cypher)
                .param("id", id)
                .param("props", BoltType::Map(to_bolt_map(&properties))),
            "Failed to update node",
        )
        .await
    }

    async fn merge_edge(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        to: &NodeRef,
        key: Properties,
    ) -> Result<Option<Edge>> {
        let cypher = format!(
            r#"
            MATCH (a:{} {{id: $from}}), (b:{} {{id: $to}})
            MERGE (a)-[r:{}{}]->(b)
            ON CREATE SET r.createdAt = $now
            RETURN properties(r) AS edge
            "#,
            from.label,
            to.label,
            kind,
            key_literal(&key)?
        );
        let q = query(&cypher)
            .param("from", from.id.as_str())
            .param("to", to.id.as_str())
            .param("now", Utc::now().to_rfc3339());

        let rows = self
            .fetch(bind_key(q, &key))
            .await
            .with_context(|| format!("Failed to merge {} edge", kind))?;

        debug!("Merged {}: {} -> {}", kind, from.id, to.id);
        rows.first()
            .map(|row| {
                let properties: Properties = row.get("edge").context("Missing edge column")?;
                Ok(Edge {
                    kind,
                    from: from.clone(),
                    to: to.clone(),
                    properties,
                })
            })
            .transpose()
    }

    async fn delete_edge(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        to: &NodeRef,
        key: Properties,
    ) -> Result<Option<Edge>> {
        let cypher = format!(
            r#"
            MATCH (a:{} {{id: $from}})-[r:{}{}]->(b:{} {{id: $to}})
            WITH r, properties(r) AS edge
            DELETE r
            RETURN edge
            "#,
            from.label,
            kind,
            key_literal(&key)?,
            to.label
        );
        let q = query(&cypher)
            .param("from", from.id.as_str())
            .param("to", to.id.as_str());

        let rows = self
            .fetch(bind_key(q, &key))
            .await
            .with_context(|| format!("Failed to delete {} edge", kind))?;

        debug!("Deleted {}: {} -> {}", kind, from.id, to.id);
        rows.first()
            .map(|row| {
                let properties: Properties = row.get("edge").context("Missing edge column")?;
                Ok(Edge {
                    kind,
                    from: from.clone(),
                    to: to.clone(),
                    properties,
                })
            })
            .transpose()
    }

    async fn replace_edges(
        &self,
        from: &NodeRef,
        kind: EdgeKind,
        targets: &[NodeRef],
    ) -> Result<()> {
        let mut txn = self
            .graph
            .start_txn()
            .await
            .context("Failed to start transaction")?;

        let delete = format!("MATCH (a:{} {{id: $from}})-[r:{}]->() DELETE r", from.label, kind);
        txn.run(query(&delete).param("from", from.id.as_str()))
            .await
            .with_context(|| format!("Failed to delete previous {} edges", kind))?;

        let now = Utc::now().to_rfc3339();
        for target in targets {
            let merge = format!(
                r#"
                MATCH (a:{} {{id: $from}}), (b:{} {{id: $to}})
                MERGE (a)-[r:{}]->(b)
                ON CREATE SET r.createdAt = $now
                "#,
                from.label, target.label, kind
            );
            txn.run(
                query(&merge)
                    .param("from", from.id.as_str())
                    .param("to", target.id.as_str())
                    .param("now", now.as_str()),
            )
            .await
            .with_context(|| format!("Failed to merge {} edge", kind))?;
        }

        txn.commit().await.context("Failed to commit edge replacement")?;

        debug!("Replaced {} edges of {} ({} targets)", kind, from.id, targets.len());
        Ok(())
    }

    async fn set_disabled(
        &self,
        target: &NodeRef,
        moderator_id: &str,
        disabled: bool,
    ) -> Result<bool> {
        let cypher = if disabled {
            format!(
                r#"
                MATCH (m:User {{id: $moderator}}), (n:{} {{id: $id}})
                OPTIONAL MATCH (n)<-[old:DISABLED]-(:User)
                DELETE old
                WITH DISTINCT m, n
                SET n.disabled = true
                MERGE (n)<-[r:DISABLED]-(m)
                ON CREATE SET r.createdAt = $now
                RETURN n.id AS id
                "#,
                target.label
            )
        } else {
            format!(
                r#"
                MATCH (n:{} {{id: $id}})
                OPTIONAL MATCH (n)<-[d:DISABLED]-(:User)
                WITH n, collect(d) AS edges
                WHERE n.disabled = true OR size(edges) > 0
                FOREACH (edge IN edges | DELETE edge)
                SET n.disabled = false
                RETURN n.id AS id
                "#,
                target.label
            )
        };

        let rows = self
            .fetch(
                query(&cypher)
                    .param("id", target.id.as_str())
                    .param("moderator", moderator_id)
                    .param("now", Utc::now().to_rfc3339()),
            )
            .await
            .context("Failed to update disabled state")?;

        Ok(!rows.is_empty())
    }

    async fn related(&self, from: &NodeRef, relation: &Relation) -> Result<Vec<Related>> {
        self.traverse(from, relation, relation.has_many_query(from.label))
            .await
    }

    async fn related_one(&self, from: &NodeRef, relation: &Relation) -> Result<Option<Related>> {
        let mut related = self
            .traverse(from, relation, relation.has_one_query(from.label))
            .await?;
        Ok(related.pop())
    }

    async fn count_related(&self, from: &NodeRef, relation: &Relation) -> Result<i64> {
        let cypher = relation.count_query(from.label);
        let rows = self
            .fetch(query(&cypher).param("id", from.id.as_str()))
            .await
            .with_context(|| format!("Failed to count {} relations", relation.edge))?;

        Ok(rows
            .first()
            .and_then(|row| row.get::<i64>("total").ok())
            .unwrap_or(0))
    }

    async fn is_related(
        &self,
        from: &NodeRef,
        relation: &Relation,
        other_id: &str,
    ) -> Result<bool> {
        let cypher = relation.exists_query(from.label);
        let rows = self
            .fetch(
                query(&cypher)
                    .param("id", from.id.as_str())
                    .param("other", other_id),
            )
            .await
            .with_context(|| format!("Failed to check {} relation", relation.edge))?;

        Ok(rows
            .first()
            .and_then(|row| row.get::<bool>("related").ok())
            .unwrap_or(false))
    }

    async fn health_check(&self) -> Result<()> {
        let rows = self
            .fetch(query("RETURN 1 AS health"))
            .await
            .context("Health check query failed")?;

        match rows.first().and_then(|row| row.get::<i64>("health").ok()) {
            Some(1) => Ok(()),
            _ => Err(anyhow!("Neo4j health check returned no result")),
        }
    }
}
