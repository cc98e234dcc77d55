//! GraphQL schema
//!
//! Entity objects wrap store nodes; every root field carries a
//! [`PermissionGuard`](crate::permissions::PermissionGuard).

pub mod comment;
pub mod moderation;
pub mod post;
pub mod social;
pub mod user;

use async_graphql::{EmptySubscription, MergedObject, Schema};
use graph_store::Node;

use crate::config::GraphQLConfig;

#[derive(MergedObject, Default)]
pub struct QueryRoot(post::PostQuery, comment::CommentQuery, user::UserQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    post::PostMutation,
    comment::CommentMutation,
    user::UserMutation,
    social::SocialMutation,
    moderation::ModerationMutation,
);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema; the request context is attached per request
pub fn build_schema(config: &GraphQLConfig) -> AppSchema {
    let builder = Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .limit_depth(config.max_depth);

    if config.introspection {
        builder.finish()
    } else {
        builder.disable_introspection().finish()
    }
}

/// String property of a node, if present
pub(crate) fn prop(node: &Node, key: &str) -> Option<String> {
    node.get_str(key).map(str::to_string)
}
