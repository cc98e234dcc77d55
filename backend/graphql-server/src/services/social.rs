//! Follows, shouts and blocks between users and posts

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::model::{FollowType, ShoutType};
use crate::relations;
use graph_store::{EdgeKind, Label, Node, NodeRef, Properties};
use tracing::{debug, info};

/// Resolve `id` and check the stored label matches the requested type
async fn typed_target(ctx: &RequestContext, id: &str, expected: Label) -> ApiResult<Option<NodeRef>> {
    let target = ctx.store.resolve(id).await?;
    Ok(target.filter(|target| target.label == expected))
}

pub async fn follow(ctx: &RequestContext, id: &str, follow_type: FollowType) -> ApiResult<bool> {
    let user = ctx.require_user()?;
    if user.id == id {
        return Ok(false);
    }
    let Some(target) = typed_target(ctx, id, follow_type.label()).await? else {
        return Ok(false);
    };

    let edge = ctx
        .store
        .merge_edge(&NodeRef::user(user.id.as_str()), EdgeKind::Follows, &target, Properties::new())
        .await?;

    debug!("Created FOLLOWS: {} -> {}", user.id, id);
    Ok(edge.is_some())
}

pub async fn unfollow(ctx: &RequestContext, id: &str, follow_type: FollowType) -> ApiResult<bool> {
    let user = ctx.require_user()?;
    let Some(target) = typed_target(ctx, id, follow_type.label()).await? else {
        return Ok(false);
    };

    let removed = ctx
        .store
        .delete_edge(&NodeRef::user(user.id.as_str()), EdgeKind::Follows, &target, Properties::new())
        .await?;

    debug!("Deleted FOLLOWS: {} -> {}", user.id, id);
    Ok(removed.is_some())
}

/// Shouting one's own post is refused
pub async fn shout(ctx: &RequestContext, id: &str, shout_type: ShoutType) -> ApiResult<bool> {
    let user = ctx.require_user()?;
    let Some(target) = typed_target(ctx, id, shout_type.label()).await? else {
        return Ok(false);
    };
    if ctx
        .store
        .is_related(&target, &relations::AUTHOR, &user.id)
        .await?
    {
        return Ok(false);
    }

    let edge = ctx
        .store
        .merge_edge(&NodeRef::user(user.id.as_str()), EdgeKind::Shouted, &target, Properties::new())
        .await?;

    debug!("Created SHOUTED: {} -> {}", user.id, id);
    Ok(edge.is_some())
}

pub async fn unshout(ctx: &RequestContext, id: &str, shout_type: ShoutType) -> ApiResult<bool> {
    let user = ctx.require_user()?;
    let Some(target) = typed_target(ctx, id, shout_type.label()).await? else {
        return Ok(false);
    };

    let removed = ctx
        .store
        .delete_edge(&NodeRef::user(user.id.as_str()), EdgeKind::Shouted, &target, Properties::new())
        .await?;

    debug!("Deleted SHOUTED: {} -> {}", user.id, id);
    Ok(removed.is_some())
}

/// Block a user; the caller also stops following them
pub async fn block(ctx: &RequestContext, id: &str) -> ApiResult<Option<Node>> {
    let user = ctx.require_user()?;
    if user.id == id {
        return Err(ApiError::validation("Cannot block yourself"));
    }
    let Some(target) = ctx.store.find_node(Label::User, id).await? else {
        return Ok(None);
    };

    let me = NodeRef::user(user.id.as_str());
    ctx.store
        .delete_edge(&me, EdgeKind::Follows, &target.node_ref(), Properties::new())
        .await?;
    ctx.store
        .merge_edge(&me, EdgeKind::Blocked, &target.node_ref(), Properties::new())
        .await?;

    info!(user_id = %user.id, blocked_id = %id, "User blocked");
    Ok(Some(target))
}

pub async fn unblock(ctx: &RequestContext, id: &str) -> ApiResult<Option<Node>> {
    let user = ctx.require_user()?;
    let Some(target) = ctx.store.find_node(Label::User, id).await? else {
        return Ok(None);
    };

    ctx.store
        .delete_edge(
            &NodeRef::user(user.id.as_str()),
            EdgeKind::Blocked,
            &target.node_ref(),
            Properties::new(),
        )
        .await?;

    info!(user_id = %user.id, unblocked_id = %id, "User unblocked");
    Ok(Some(target))
}

pub async fn blocked_users(ctx: &RequestContext) -> ApiResult<Vec<Node>> {
    let user = ctx.require_user()?;
    let blocked = ctx
        .store
        .related(&NodeRef::user(user.id.as_str()), &relations::user::BLOCKED)
        .await?;
    Ok(blocked.into_iter().map(|related| related.node).collect())
}

/// Whether the caller blocked `user_id`
pub async fn is_blocked(ctx: &RequestContext, user_id: &str) -> ApiResult<bool> {
    let Some(me) = ctx.user_id() else {
        return Ok(false);
    };
    let blocked = ctx
        .store
        .is_related(&NodeRef::user(me), &relations::user::BLOCKED, user_id)
        .await?;
    Ok(blocked)
}

/// Ids of users the caller blocked or is blocked by
pub async fn excluded_authors(ctx: &RequestContext) -> ApiResult<Vec<String>> {
    let Some(me) = ctx.user_id() else {
        return Ok(Vec::new());
    };
    let me = NodeRef::user(me);

    let mut ids: Vec<String> = Vec::new();
    for relation in [&relations::user::BLOCKED, &relations::user::BLOCKED_BY] {
        for related in ctx.store.related(&me, relation).await? {
            let id = related.node.id().to_string();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}
