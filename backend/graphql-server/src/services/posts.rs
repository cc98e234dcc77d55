//! Post resolvers: create, update, soft delete, listing and emotions
//!
//! Categories and title/content are validated before the first write. Tags
//! are reconciled from the content after every content change.

use super::{hashtags, now, social, soft_delete, text, visible};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::model::Emotion;
use crate::relations;
use graph_store::{props, EdgeKind, Label, Node, NodeFilter, NodeRef, Properties};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub const CATEGORY_BOUNDS: &str =
    "You cannot save a post without at least one category or more than three";

pub const MAX_CATEGORIES: usize = 3;

/// Related contributions returned per post
pub const RELATED_LIMIT: usize = 10;

/// Default result size of `findPosts`
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    pub language: Option<String>,
    pub category_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub id: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub category_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub disabled: Option<bool>,
    /// Keep posts in at least one of these categories
    pub category_ids: Option<Vec<String>>,
}

/// An EMOTED edge with both endpoints loaded
#[derive(Debug, Clone)]
pub struct Emoted {
    pub from: Node,
    pub to: Node,
    pub emotion: Emotion,
}

#[derive(Debug, Validate)]
struct PostFields {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    title: Option<String>,
    #[validate(length(min = 1, message = "Post content must not be empty"))]
    content: Option<String>,
}

fn validate_fields(title: Option<&str>, content: Option<&str>) -> ApiResult<()> {
    let fields = PostFields {
        title: title.map(|title| title.trim().to_string()),
        content: content.map(text::strip_markup),
    };
    fields.validate()?;
    Ok(())
}

/// Check the category bounds and that every category exists
///
/// Duplicate ids collapse before counting.
pub async fn category_refs(ctx: &RequestContext, ids: Option<&[String]>) -> ApiResult<Vec<NodeRef>> {
    let mut unique: Vec<&str> = Vec::new();
    for id in ids.unwrap_or_default() {
        if !unique.contains(&id.as_str()) {
            unique.push(id);
        }
    }
    if unique.is_empty() || unique.len() > MAX_CATEGORIES {
        return Err(ApiError::validation(CATEGORY_BOUNDS));
    }

    let mut missing = Vec::new();
    for id in &unique {
        if ctx.store.find_node(Label::Category, id).await?.is_none() {
            missing.push(*id);
        }
    }
    if !missing.is_empty() {
        return Err(ApiError::validation(format!(
            "Category not found: {}",
            missing.join(", ")
        )));
    }

    Ok(unique
        .into_iter()
        .map(|id| NodeRef::new(Label::Category, id))
        .collect())
}

pub async fn create_post(ctx: &RequestContext, draft: PostDraft) -> ApiResult<Node> {
    let user = ctx.require_user()?;
    let categories = category_refs(ctx, draft.category_ids.as_deref()).await?;
    validate_fields(Some(&draft.title), Some(&draft.content))?;

    let id = draft.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    if ctx.store.resolve(&id).await?.is_some() {
        return Err(ApiError::validation(format!("Id {} is already in use", id)));
    }

    let title = draft.title.trim().to_string();
    let slug = text::unique_slug(ctx, Label::Post, &title).await?;
    let timestamp = now();
    let mut properties = props! {
        "id" => id.as_str(),
        "title" => title.as_str(),
        "content" => draft.content.as_str(),
        "contentExcerpt" => text::excerpt(&draft.content),
        "slug" => slug,
        "deleted" => false,
        "disabled" => false,
        "createdAt" => timestamp.as_str(),
        "updatedAt" => timestamp.as_str(),
    };
    if let Some(language) = draft.language {
        properties.insert("language".to_string(), Value::String(language));
    }

    let post = ctx.store.create_node(Label::Post, properties).await?;
    let post_ref = post.node_ref();
    ctx.store
        .merge_edge(
            &NodeRef::user(user.id.as_str()),
            EdgeKind::Wrote,
            &post_ref,
            Properties::new(),
        )
        .await?;
    ctx.store
        .replace_edges(&post_ref, EdgeKind::Categorized, &categories)
        .await?;
    hashtags::reconcile_tags(ctx, &post_ref, &draft.content).await?;

    info!(post_id = %id, author_id = %user.id, "Post created");
    Ok(post)
}

/// Omitted fields keep their value; `category_ids` replaces all categories.
/// Without `category_ids` the stored categories must already be in bounds.
pub async fn update_post(ctx: &RequestContext, changes: PostChanges) -> ApiResult<Option<Node>> {
    let categories = match changes.category_ids.as_deref() {
        Some(ids) => Some(category_refs(ctx, Some(ids)).await?),
        None => {
            let current = ctx
                .store
                .count_related(&NodeRef::post(changes.id.as_str()), &relations::post::CATEGORIES)
                .await?;
            if !(1..=MAX_CATEGORIES as i64).contains(&current) {
                return Err(ApiError::validation(CATEGORY_BOUNDS));
            }
            None
        }
    };
    validate_fields(changes.title.as_deref(), changes.content.as_deref())?;

    let mut properties = props! { "updatedAt" => now() };
    if let Some(title) = &changes.title {
        properties.insert("title".to_string(), Value::String(title.trim().to_string()));
    }
    if let Some(content) = &changes.content {
        properties.insert("content".to_string(), Value::String(content.clone()));
        properties.insert(
            "contentExcerpt".to_string(),
            Value::String(text::excerpt(content)),
        );
    }
    if let Some(language) = changes.language {
        properties.insert("language".to_string(), Value::String(language));
    }

    let Some(post) = ctx
        .store
        .update_node(Label::Post, &changes.id, properties)
        .await?
    else {
        return Ok(None);
    };

    let post_ref = post.node_ref();
    if let Some(categories) = categories {
        ctx.store
            .replace_edges(&post_ref, EdgeKind::Categorized, &categories)
            .await?;
    }
    if let Some(content) = &changes.content {
        hashtags::reconcile_tags(ctx, &post_ref, content).await?;
    }

    info!(post_id = %changes.id, "Post updated");
    Ok(Some(post))
}

pub async fn delete_post(ctx: &RequestContext, id: &str) -> ApiResult<Option<Node>> {
    let post = soft_delete(ctx, Label::Post, id).await?;
    info!(post_id = %id, "Post deleted");
    Ok(post)
}

/// Visible posts, minus those of blocked or blocking authors
pub async fn find_posts(ctx: &RequestContext, query: PostQuery) -> ApiResult<Vec<Node>> {
    let mut filter = visible(ctx, NodeFilter::default(), query.disabled);
    if let Some(id) = query.id {
        filter = filter.with("id", Value::String(id));
    }
    if let Some(slug) = query.slug {
        filter = filter.with("slug", Value::String(slug));
    }
    let filter = filter.excluding_authors(social::excluded_authors(ctx).await?);

    let posts = ctx.store.find_nodes(Label::Post, &filter).await?;
    match query.category_ids {
        Some(category_ids) => in_categories(ctx, posts, &category_ids).await,
        None => Ok(posts),
    }
}

async fn in_categories(
    ctx: &RequestContext,
    posts: Vec<Node>,
    category_ids: &[String],
) -> ApiResult<Vec<Node>> {
    let mut kept = Vec::new();
    for post in posts {
        let post_ref = post.node_ref();
        let mut matched = false;
        for id in category_ids {
            if ctx
                .store
                .is_related(&post_ref, &relations::post::CATEGORIES, id)
                .await?
            {
                matched = true;
                break;
            }
        }
        if matched {
            kept.push(post);
        }
    }
    Ok(kept)
}

/// Visible posts whose title or content contains `query`, ignoring case
///
/// Markup is stripped from the content before matching. A blank query
/// finds nothing.
pub async fn search_posts(
    ctx: &RequestContext,
    query: &str,
    limit: Option<usize>,
) -> ApiResult<Vec<Node>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let filter = visible(ctx, NodeFilter::default(), None)
        .excluding_authors(social::excluded_authors(ctx).await?);
    let found: Vec<Node> = ctx
        .store
        .find_nodes(Label::Post, &filter)
        .await?
        .into_iter()
        .filter(|post| {
            let title = post.get_str("title").unwrap_or_default().to_lowercase();
            let content = text::strip_markup(post.get_str("content").unwrap_or_default());
            title.contains(&needle) || content.to_lowercase().contains(&needle)
        })
        .take(limit.unwrap_or(SEARCH_LIMIT))
        .collect();

    debug!(query = %needle, hits = found.len(), "Searched posts");
    Ok(found)
}

/// Posts sharing a tag or category with `post`, without the post itself
pub async fn related_contributions(ctx: &RequestContext, post: &NodeRef) -> ApiResult<Vec<Node>> {
    let mut hubs = ctx.store.related(post, &relations::post::TAGS).await?;
    hubs.extend(ctx.store.related(post, &relations::post::CATEGORIES).await?);

    let mut contributions: Vec<Node> = Vec::new();
    for hub in hubs {
        let posts = match hub.node.label {
            Label::Tag => relations::tag::POSTS,
            _ => relations::category::POSTS,
        };
        for related in ctx.store.related(&hub.node.node_ref(), &posts).await? {
            let id = related.node.id();
            if id != post.id && contributions.iter().all(|known| known.id() != id) {
                contributions.push(related.node);
            }
            if contributions.len() == RELATED_LIMIT {
                return Ok(contributions);
            }
        }
    }
    Ok(contributions)
}

/// Returns None when the post is missing, deleted or disabled
pub async fn add_emotion(ctx: &RequestContext, post_id: &str, emotion: Emotion) -> ApiResult<Option<Emoted>> {
    let user = ctx.require_user()?;
    let Some(post) = ctx.store.find_node(Label::Post, post_id).await? else {
        return Ok(None);
    };
    if !post.is_active() {
        return Ok(None);
    }
    let Some(from) = ctx.store.find_node(Label::User, &user.id).await? else {
        return Ok(None);
    };

    let edge = ctx
        .store
        .merge_edge(
            &from.node_ref(),
            EdgeKind::Emoted,
            &post.node_ref(),
            props! { "emotion" => emotion.as_str() },
        )
        .await?;

    Ok(edge.map(|_| Emoted {
        from,
        to: post,
        emotion,
    }))
}

/// Returns None when there was no such emotion to remove
pub async fn remove_emotion(ctx: &RequestContext, post_id: &str, emotion: Emotion) -> ApiResult<Option<Emoted>> {
    let user = ctx.require_user()?;
    let removed = ctx
        .store
        .delete_edge(
            &NodeRef::user(user.id.as_str()),
            EdgeKind::Emoted,
            &NodeRef::post(post_id),
            props! { "emotion" => emotion.as_str() },
        )
        .await?;
    if removed.is_none() {
        return Ok(None);
    }

    let from = ctx.store.find_node(Label::User, &user.id).await?;
    let to = ctx.store.find_node(Label::Post, post_id).await?;
    Ok(from.zip(to).map(|(from, to)| Emoted { from, to, emotion }))
}

/// All EMOTED edges on a post
pub async fn emotions(ctx: &RequestContext, post: &NodeRef) -> ApiResult<Vec<Emoted>> {
    let Some(to) = ctx.store.find_node(Label::Post, &post.id).await? else {
        return Ok(Vec::new());
    };
    let related = ctx.store.related(post, &relations::post::EMOTIONS).await?;
    Ok(related
        .into_iter()
        .filter_map(|related| {
            let emotion = related.edge.get_str("emotion").and_then(Emotion::parse)?;
            Some(Emoted {
                from: related.node,
                to: to.clone(),
                emotion,
            })
        })
        .collect())
}

pub async fn emotions_count_by_emotion(ctx: &RequestContext, post_id: &str, emotion: Emotion) -> ApiResult<i64> {
    let related = ctx
        .store
        .related(&NodeRef::post(post_id), &relations::post::EMOTIONS)
        .await?;
    Ok(related
        .iter()
        .filter(|related| related.edge.get_str("emotion") == Some(emotion.as_str()))
        .count() as i64)
}

pub async fn emotions_by_current_user(ctx: &RequestContext, post_id: &str) -> ApiResult<Vec<Emotion>> {
    let user = ctx.require_user()?;
    let related = ctx
        .store
        .related(&NodeRef::post(post_id), &relations::post::EMOTIONS)
        .await?;
    Ok(related
        .iter()
        .filter(|related| related.node.id() == user.id)
        .filter_map(|related| related.edge.get_str("emotion").and_then(Emotion::parse))
        .collect())
}

pub async fn find_categories(ctx: &RequestContext, id: Option<String>) -> ApiResult<Vec<Node>> {
    let filter = match id {
        Some(id) => NodeFilter::by_id(id),
        None => NodeFilter::default(),
    };
    let categories = ctx.store.find_nodes(Label::Category, &filter).await?;
    Ok(categories)
}

pub async fn find_tags(ctx: &RequestContext, id: Option<String>) -> ApiResult<Vec<Node>> {
    let filter = match id {
        Some(id) => NodeFilter::by_id(id),
        None => NodeFilter::default(),
    };
    let tags = ctx.store.find_nodes(Label::Tag, &filter).await?;
    Ok(tags)
}
