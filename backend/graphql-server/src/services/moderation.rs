//! Disable and enable any supported resource by id
//!
//! The id is resolved once to a [`Resource`] using the label stored on the
//! node. Ids of unsupported kinds, or unknown ids, yield `None`.

use crate::context::RequestContext;
use crate::error::ApiResult;
use crate::model::ResourceKind;
use graph_store::NodeRef;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub node: NodeRef,
}

pub async fn resolve_resource(ctx: &RequestContext, id: &str) -> ApiResult<Option<Resource>> {
    let Some(node) = ctx.store.resolve(id).await? else {
        debug!(id = %id, "No node for moderation target");
        return Ok(None);
    };
    Ok(ResourceKind::from_label(node.label).map(|kind| Resource { kind, node }))
}

/// Returns the id of the disabled resource
pub async fn disable(ctx: &RequestContext, id: &str) -> ApiResult<Option<String>> {
    set_disabled(ctx, id, true).await
}

/// Returns the id of the enabled resource, or None if it was not disabled
pub async fn enable(ctx: &RequestContext, id: &str) -> ApiResult<Option<String>> {
    set_disabled(ctx, id, false).await
}

async fn set_disabled(ctx: &RequestContext, id: &str, disabled: bool) -> ApiResult<Option<String>> {
    let moderator = ctx.require_user()?;
    let Some(resource) = resolve_resource(ctx, id).await? else {
        return Ok(None);
    };

    let changed = match resource.kind {
        // a moderator cannot lock themselves out
        ResourceKind::User if resource.node.id == moderator.id => false,
        ResourceKind::User | ResourceKind::Post | ResourceKind::Comment => {
            ctx.store
                .set_disabled(&resource.node, &moderator.id, disabled)
                .await?
        }
    };
    if !changed {
        return Ok(None);
    }

    info!(
        id = %id,
        kind = ?resource.kind,
        moderator_id = %moderator.id,
        disabled,
        "Moderation state changed"
    );
    Ok(Some(resource.node.id))
}
