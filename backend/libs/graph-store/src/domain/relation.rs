//! Declarative relation specs and the Cypher built from them.
//!
//! Entity resolvers describe their relationships as [`Relation`] values
//! (edge kind, direction, target label). Each relation shape (has-one,
//! has-many, count, boolean) has exactly one query builder here, so no
//! resolver hand-writes traversal Cypher.

use super::label::{Direction, EdgeKind, Label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub edge: EdgeKind,
    pub direction: Direction,
    pub target: Label,
    /// Skip related nodes that are deleted or disabled
    pub active_only: bool,
}

impl Relation {
    pub const fn outgoing(edge: EdgeKind, target: Label) -> Self {
        Self {
            edge,
            direction: Direction::Outgoing,
            target,
            active_only: false,
        }
    }

    pub const fn incoming(edge: EdgeKind, target: Label) -> Self {
        Self {
            edge,
            direction: Direction::Incoming,
            target,
            active_only: false,
        }
    }

    pub const fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    /// `(n)-[r:EDGE]->(related:Target)` or the incoming mirror
    pub fn pattern(&self) -> String {
        match self.direction {
            Direction::Outgoing => format!("-[r:{}]->(related:{})", self.edge, self.target),
            Direction::Incoming => format!("<-[r:{}]-(related:{})", self.edge, self.target),
        }
    }

    fn active_clause(&self) -> &'static str {
        if self.active_only {
            " WHERE coalesce(related.deleted, false) = false AND coalesce(related.disabled, false) = false"
        } else {
            ""
        }
    }

    fn source(&self, source: Label) -> String {
        format!("MATCH (n:{} {{id: $id}})", source)
    }

    /// Has-many: every related node with its edge, oldest edge first
    pub fn has_many_query(&self, source: Label) -> String {
        format!(
            "{}{}{} RETURN properties(related) AS node, properties(r) AS edge ORDER BY r.createdAt, related.id",
            self.source(source),
            self.pattern(),
            self.active_clause()
        )
    }

    /// Has-one: the most recent related node
    pub fn has_one_query(&self, source: Label) -> String {
        format!(
            "{}{}{} RETURN properties(related) AS node, properties(r) AS edge ORDER BY r.createdAt DESC LIMIT 1",
            self.source(source),
            self.pattern(),
            self.active_clause()
        )
    }

    /// Count: number of matching edges
    pub fn count_query(&self, source: Label) -> String {
        format!(
            "{}{}{} RETURN count(r) AS total",
            self.source(source),
            self.pattern(),
            self.active_clause()
        )
    }

    /// Boolean: whether the related node with `$other` is reachable
    pub fn exists_query(&self, source: Label) -> String {
        let filter = if self.active_only {
            format!("{} AND related.id = $other", self.active_clause())
        } else {
            " WHERE related.id = $other".to_string()
        };
        format!(
            "{}{}{} RETURN count(r) > 0 AS related",
            self.source(source),
            self.pattern(),
            filter
        )
    }
}
