//! Relation-shaped field resolution shared by the entity objects.
//!
//! Each helper maps one relation shape onto the store: has-one, has-many,
//! count and boolean. The boolean shape asks about the current user.

use crate::context::RequestContext;
use crate::error::ApiResult;
use graph_store::{Node, NodeRef, Relation};

pub async fn has_one(ctx: &RequestContext, from: &NodeRef, relation: &Relation) -> ApiResult<Option<Node>> {
    let related = ctx.store.related_one(from, relation).await?;
    Ok(related.map(|related| related.node))
}

pub async fn has_many(ctx: &RequestContext, from: &NodeRef, relation: &Relation) -> ApiResult<Vec<Node>> {
    let related = ctx.store.related(from, relation).await?;
    Ok(related.into_iter().map(|related| related.node).collect())
}

pub async fn count(ctx: &RequestContext, from: &NodeRef, relation: &Relation) -> ApiResult<i64> {
    Ok(ctx.store.count_related(from, relation).await?)
}

/// False for anonymous callers
pub async fn current_user_related(
    ctx: &RequestContext,
    from: &NodeRef,
    relation: &Relation,
) -> ApiResult<bool> {
    match ctx.user_id() {
        Some(user_id) => Ok(ctx.store.is_related(from, relation, user_id).await?),
        None => Ok(false),
    }
}
