//! Graph store adapter for the social graph API.
//!
//! The [`GraphStore`] trait is the narrow interface resolvers use to talk to
//! the property graph. [`Neo4jStore`] runs Cypher over `neo4rs`;
//! [`MemoryStore`] keeps the graph in process for tests and local runs.

pub mod domain;
pub mod repository;

pub use domain::label::{Direction, EdgeKind, Label};
pub use domain::node::{Edge, Node, NodeFilter, NodeRef, Properties, Related};
pub use domain::relation::Relation;
pub use repository::{GraphStore, MemoryStore, Neo4jStore};

pub use serde_json;
