use super::{now, soft_delete, text, visible};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use graph_store::{props, EdgeKind, Label, Node, NodeFilter, NodeRef, Properties};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

pub const COMMENT_TOO_SHORT: &str = "Comment must be at least 1 character long!";
pub const COMMENT_WITHOUT_POST: &str = "Comment cannot be created without a post!";

#[derive(Debug, Clone, Default)]
pub struct CommentDraft {
    pub id: Option<String>,
    pub post_id: String,
    pub content: String,
}

/// Content must keep at least one character once markup is stripped
fn validate_content(content: &str) -> ApiResult<()> {
    if text::strip_markup(content).is_empty() {
        return Err(ApiError::validation(COMMENT_TOO_SHORT));
    }
    Ok(())
}

pub async fn create_comment(ctx: &RequestContext, draft: CommentDraft) -> ApiResult<Node> {
    let user = ctx.require_user()?;
    validate_content(&draft.content)?;

    let post = ctx
        .store
        .find_node(Label::Post, &draft.post_id)
        .await?
        .filter(|post| !post.flag("deleted"))
        .ok_or_else(|| ApiError::validation(COMMENT_WITHOUT_POST))?;

    let id = draft.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    if ctx.store.resolve(&id).await?.is_some() {
        return Err(ApiError::validation(format!("Id {} is already in use", id)));
    }

    let timestamp = now();
    let comment = ctx
        .store
        .create_node(
            Label::Comment,
            props! {
                "id" => id.as_str(),
                "content" => draft.content.as_str(),
                "contentExcerpt" => text::excerpt(&draft.content),
                "deleted" => false,
                "disabled" => false,
                "createdAt" => timestamp.as_str(),
                "updatedAt" => timestamp.as_str(),
            },
        )
        .await?;

    let comment_ref = comment.node_ref();
    ctx.store
        .merge_edge(
            &NodeRef::user(user.id.as_str()),
            EdgeKind::Wrote,
            &comment_ref,
            Properties::new(),
        )
        .await?;
    ctx.store
        .merge_edge(&comment_ref, EdgeKind::Comments, &post.node_ref(), Properties::new())
        .await?;

    info!(comment_id = %id, post_id = %draft.post_id, author_id = %user.id, "Comment created");
    Ok(comment)
}

pub async fn update_comment(ctx: &RequestContext, id: &str, content: &str) -> ApiResult<Option<Node>> {
    validate_content(content)?;

    let comment = ctx
        .store
        .update_node(
            Label::Comment,
            id,
            props! {
                "content" => content,
                "contentExcerpt" => text::excerpt(content),
                "updatedAt" => now(),
            },
        )
        .await?;

    info!(comment_id = %id, "Comment updated");
    Ok(comment)
}

pub async fn delete_comment(ctx: &RequestContext, id: &str) -> ApiResult<Option<Node>> {
    let comment = soft_delete(ctx, Label::Comment, id).await?;
    info!(comment_id = %id, "Comment deleted");
    Ok(comment)
}

pub async fn find_comments(
    ctx: &RequestContext,
    id: Option<String>,
    disabled: Option<bool>,
) -> ApiResult<Vec<Node>> {
    let mut filter = visible(ctx, NodeFilter::default(), disabled);
    if let Some(id) = id {
        filter = filter.with("id", Value::String(id));
    }
    let comments = ctx.store.find_nodes(Label::Comment, &filter).await?;
    Ok(comments)
}
