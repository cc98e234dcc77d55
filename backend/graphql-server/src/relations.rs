//! Relationship declarations per entity, consumed by the schema objects.

use graph_store::{EdgeKind, Label, Relation};

/// The user who wrote a Post or Comment
pub const AUTHOR: Relation = Relation::incoming(EdgeKind::Wrote, Label::User);

pub mod post {
    use super::*;

    pub const AUTHOR: Relation = super::AUTHOR;
    pub const DISABLED_BY: Relation = Relation::incoming(EdgeKind::Disabled, Label::User);
    pub const TAGS: Relation = Relation::outgoing(EdgeKind::Tagged, Label::Tag);
    pub const CATEGORIES: Relation = Relation::outgoing(EdgeKind::Categorized, Label::Category);
    pub const COMMENTS: Relation = Relation::incoming(EdgeKind::Comments, Label::Comment);
    pub const ACTIVE_COMMENTS: Relation =
        Relation::incoming(EdgeKind::Comments, Label::Comment).active_only();
    pub const SHOUTED_BY: Relation =
        Relation::incoming(EdgeKind::Shouted, Label::User).active_only();
    pub const EMOTIONS: Relation = Relation::incoming(EdgeKind::Emoted, Label::User);
}

pub mod comment {
    use super::*;

    pub const AUTHOR: Relation = super::AUTHOR;
    pub const POST: Relation = Relation::outgoing(EdgeKind::Comments, Label::Post);
    pub const DISABLED_BY: Relation = Relation::incoming(EdgeKind::Disabled, Label::User);
}

pub mod user {
    use super::*;

    /// Every Post or Comment written by the user, deleted ones included
    pub const CONTRIBUTIONS: Relation = Relation::outgoing(EdgeKind::Wrote, Label::Post);
    pub const COMMENTS: Relation = Relation::outgoing(EdgeKind::Wrote, Label::Comment);
    pub const ACTIVE_CONTRIBUTIONS: Relation = CONTRIBUTIONS.active_only();
    pub const ACTIVE_COMMENTS: Relation = COMMENTS.active_only();
    pub const FOLLOWED_BY: Relation =
        Relation::incoming(EdgeKind::Follows, Label::User).active_only();
    pub const FOLLOWING: Relation =
        Relation::outgoing(EdgeKind::Follows, Label::User).active_only();
    pub const SHOUTED: Relation = Relation::outgoing(EdgeKind::Shouted, Label::Post).active_only();
    pub const BLOCKED: Relation = Relation::outgoing(EdgeKind::Blocked, Label::User);
    pub const BLOCKED_BY: Relation = Relation::incoming(EdgeKind::Blocked, Label::User);
    pub const DISABLED_BY: Relation = Relation::incoming(EdgeKind::Disabled, Label::User);
}

pub mod tag {
    use super::*;

    pub const POSTS: Relation = Relation::incoming(EdgeKind::Tagged, Label::Post).active_only();
}

pub mod category {
    use super::*;

    pub const POSTS: Relation =
        Relation::incoming(EdgeKind::Categorized, Label::Post).active_only();
}
