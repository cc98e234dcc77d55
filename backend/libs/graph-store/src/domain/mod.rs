pub mod label;
pub mod node;
pub mod relation;
