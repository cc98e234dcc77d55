use super::label::{EdgeKind, Label};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Property map stored on nodes and edges
pub type Properties = serde_json::Map<String, Value>;

/// Build a property map from `key => value` pairs
#[macro_export]
macro_rules! props {
    () => { $crate::Properties::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Properties::new();
        $( map.insert(($key).to_string(), $crate::serde_json::json!($value)); )+
        map
    }};
}

/// Reference to a node by label and id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub label: Label,
    pub id: String,
}

impl NodeRef {
    pub fn new(label: Label, id: impl Into<String>) -> Self {
        Self {
            label,
            id: id.into(),
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(Label::User, id)
    }

    pub fn post(id: impl Into<String>) -> Self {
        Self::new(Label::Post, id)
    }

    pub fn comment(id: impl Into<String>) -> Self {
        Self::new(Label::Comment, id)
    }
}

/// A stored node with its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub label: Label,
    pub properties: Properties,
}

impl Node {
    pub fn new(label: Label, properties: Properties) -> Self {
        Self { label, properties }
    }

    pub fn id(&self) -> &str {
        self.get_str("id").unwrap_or_default()
    }

    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(self.label, self.id())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Missing flags read as `false`
    pub fn flag(&self, key: &str) -> bool {
        self.properties
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Not deleted and not disabled
    pub fn is_active(&self) -> bool {
        !self.flag("deleted") && !self.flag("disabled")
    }
}

/// A directed, typed relationship between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub from: NodeRef,
    pub to: NodeRef,
    pub properties: Properties,
}

impl Edge {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Every key property must be present with an equal value
    pub fn matches_key(&self, key: &Properties) -> bool {
        key.iter()
            .all(|(name, value)| self.properties.get(name) == Some(value))
    }
}

/// A node reached through a relation, with the edge that led there
#[derive(Debug, Clone, PartialEq)]
pub struct Related {
    pub node: Node,
    pub edge: Edge,
}

/// Filter for listing nodes of one label
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    /// Property equality constraints
    pub properties: Properties,
    /// Skip nodes written by any of these user ids
    pub exclude_authors: Vec<String>,
}

impl NodeFilter {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self::default().with("id", Value::String(id.into()))
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    pub fn excluding_authors(mut self, authors: Vec<String>) -> Self {
        self.exclude_authors = authors;
        self
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.properties.iter().all(|(key, expected)| {
            match (node.properties.get(key), expected) {
                (Some(actual), expected) => actual == expected,
                // unset flags compare equal to `false`
                (None, Value::Bool(false)) => true,
                (None, _) => false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_macro_builds_map() {
        let map = props! { "id" => "p1", "deleted" => false };
        assert_eq!(map.get("id"), Some(&json!("p1")));
        assert_eq!(map.get("deleted"), Some(&json!(false)));
    }

    #[test]
    fn test_missing_flag_reads_false() {
        let node = Node::new(Label::Post, props! { "id" => "p1" });
        assert!(!node.flag("disabled"));
        assert!(node.is_active());
    }

    #[test]
    fn test_filter_treats_unset_flag_as_false() {
        let node = Node::new(Label::Post, props! { "id" => "p1" });
        let filter = NodeFilter::default().with("deleted", json!(false));
        assert!(filter.matches(&node));

        let filter = NodeFilter::default().with("deleted", json!(true));
        assert!(!filter.matches(&node));
    }

    #[test]
    fn test_edge_key_matching() {
        let edge = Edge {
            kind: EdgeKind::Emoted,
            from: NodeRef::user("u1"),
            to: NodeRef::post("p1"),
            properties: props! { "emotion" => "happy", "createdAt" => "2019-01-01" },
        };
        assert!(edge.matches_key(&props! { "emotion" => "happy" }));
        assert!(!edge.matches_key(&props! { "emotion" => "cry" }));
        assert!(edge.matches_key(&Properties::new()));
    }
}
