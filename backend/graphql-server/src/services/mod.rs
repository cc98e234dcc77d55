//! Resource resolvers
//!
//! One module per entity. Every function takes the explicit
//! [`RequestContext`] and assumes the permission guard already ran.

pub mod comments;
pub mod hashtags;
pub mod moderation;
pub mod posts;
pub mod reports;
pub mod seed;
pub mod social;
pub mod text;
pub mod users;

use crate::context::RequestContext;
use crate::error::ApiResult;
use chrono::Utc;
use graph_store::{props, Label, Node, NodeFilter};
use serde_json::Value;

/// Content of soft-deleted posts and comments
pub const DELETED: &str = "DELETED";

/// Name and about of deleted user accounts
pub const UNAVAILABLE: &str = "UNAVAILABLE";

pub(crate) fn now() -> String {
    Utc::now().to_rfc3339()
}

/// Restrict a list filter to what the caller may see
///
/// Deleted nodes never show up. Disabled nodes are hidden unless a moderator
/// asks for them.
pub(crate) fn visible(ctx: &RequestContext, filter: NodeFilter, disabled: Option<bool>) -> NodeFilter {
    let disabled = match disabled {
        Some(disabled) if ctx.is_moderator() => disabled,
        _ => false,
    };
    filter
        .with("deleted", Value::Bool(false))
        .with("disabled", Value::Bool(disabled))
}

/// Flag a post or comment deleted and blank its content
pub(crate) async fn soft_delete(ctx: &RequestContext, label: Label, id: &str) -> ApiResult<Option<Node>> {
    let node = ctx
        .store
        .update_node(
            label,
            id,
            props! {
                "deleted" => true,
                "content" => DELETED,
                "contentExcerpt" => DELETED,
                "updatedAt" => now(),
            },
        )
        .await?;
    Ok(node)
}
