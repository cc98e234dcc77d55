use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Node labels known to the social graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    User,
    Post,
    Comment,
    Category,
    Tag,
}

impl Label {
    pub const ALL: [Label; 5] = [
        Label::User,
        Label::Post,
        Label::Comment,
        Label::Category,
        Label::Tag,
    ];

    /// Labels an id can be dispatched to by `resolve`
    pub const RESOURCES: [Label; 3] = [Label::User, Label::Post, Label::Comment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::User => "User",
            Label::Post => "Post",
            Label::Comment => "Comment",
            Label::Category => "Category",
            Label::Tag => "Tag",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown node label: {}", s))
    }
}

/// Relationship types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// (User)-[:WROTE]->(Post|Comment)
    Wrote,
    /// (Comment)-[:COMMENTS]->(Post)
    Comments,
    /// (Post)-[:CATEGORIZED]->(Category)
    Categorized,
    /// (Post)-[:TAGGED]->(Tag)
    Tagged,
    /// (User)-[:EMOTED {emotion}]->(Post)
    Emoted,
    /// (User)-[:SHOUTED]->(Post)
    Shouted,
    /// (User)-[:FOLLOWS]->(User)
    Follows,
    /// (User)-[:BLOCKED]->(User)
    Blocked,
    /// (User)-[:DISABLED]->(User|Post|Comment)
    Disabled,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Wrote => "WROTE",
            EdgeKind::Comments => "COMMENTS",
            EdgeKind::Categorized => "CATEGORIZED",
            EdgeKind::Tagged => "TAGGED",
            EdgeKind::Emoted => "EMOTED",
            EdgeKind::Shouted => "SHOUTED",
            EdgeKind::Follows => "FOLLOWS",
            EdgeKind::Blocked => "BLOCKED",
            EdgeKind::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a relation, seen from the node it starts at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
}
