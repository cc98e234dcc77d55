mod memory_repository;
mod neo4j_repository;
mod r#trait;

pub use memory_repository::MemoryStore;
pub use neo4j_repository::Neo4jStore;
pub use r#trait::GraphStore;
