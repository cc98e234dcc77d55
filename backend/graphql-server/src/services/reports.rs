use super::moderation::resolve_resource;
use super::now;
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::model::ResourceKind;
use graph_store::{Label, Node};
use tracing::info;
use uuid::Uuid;

/// The reported resource, under the field matching its kind
#[derive(Debug, Clone)]
pub enum ReportedResource {
    User(Node),
    Post(Node),
    Comment(Node),
}

/// Result of `report`; not persisted
#[derive(Debug, Clone)]
pub struct Report {
    pub id: String,
    pub description: Option<String>,
    pub created_at: String,
    pub kind: ResourceKind,
    pub submitter: Node,
    pub resource: ReportedResource,
}

pub async fn report(
    ctx: &RequestContext,
    id: &str,
    description: Option<String>,
) -> ApiResult<Option<Report>> {
    let user = ctx.require_user()?;
    let Some(resource) = resolve_resource(ctx, id).await? else {
        return Ok(None);
    };
    let Some(node) = ctx
        .store
        .find_node(resource.node.label, &resource.node.id)
        .await?
    else {
        return Ok(None);
    };
    let submitter = ctx
        .store
        .find_node(Label::User, &user.id)
        .await?
        .ok_or(ApiError::Authorization)?;

    let reported = match resource.kind {
        ResourceKind::User => ReportedResource::User(node),
        ResourceKind::Post => ReportedResource::Post(node),
        ResourceKind::Comment => ReportedResource::Comment(node),
    };

    let report = Report {
        id: Uuid::new_v4().to_string(),
        description,
        created_at: now(),
        kind: resource.kind,
        submitter,
        resource: reported,
    };

    info!(
        report_id = %report.id,
        resource_id = %id,
        kind = ?report.kind,
        submitter_id = %user.id,
        "Resource reported"
    );
    Ok(Some(report))
}
