use super::{now, soft_delete, visible, UNAVAILABLE};
use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::model::Deletable;
use crate::relations;
use graph_store::{props, Label, Node, NodeFilter, NodeRef};
use serde_json::Value;
use tracing::info;
use validator::Validate;

pub const NAME_NOT_A_STRING: &str = "\"name\" must be a string";

#[derive(Debug, Validate)]
struct UserFields {
    #[validate(length(min = 3, message = "\"name\" length must be at least 3 characters long"))]
    name: Option<String>,
}

/// `None` leaves a field as is; `Some(None)` means an explicit null
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub id: String,
    pub name: Option<Option<String>>,
    pub about: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub slug: Option<String>,
    pub disabled: Option<bool>,
}

pub async fn find_users(ctx: &RequestContext, query: UserQuery) -> ApiResult<Vec<Node>> {
    let mut filter = visible(ctx, NodeFilter::default(), query.disabled);
    let fields = [
        ("id", query.id),
        ("name", query.name),
        ("email", query.email),
        ("slug", query.slug),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            filter = filter.with(key, Value::String(value));
        }
    }
    let users = ctx.store.find_nodes(Label::User, &filter).await?;
    Ok(users)
}

pub async fn current_user(ctx: &RequestContext) -> ApiResult<Option<Node>> {
    let Some(id) = ctx.user_id() else {
        return Ok(None);
    };
    let user = ctx.store.find_node(Label::User, id).await?;
    Ok(user)
}

pub async fn update_user(ctx: &RequestContext, changes: UserChanges) -> ApiResult<Option<Node>> {
    let name = match changes.name {
        Some(None) => return Err(ApiError::validation(NAME_NOT_A_STRING)),
        Some(Some(name)) => Some(name.trim().to_string()),
        None => None,
    };
    UserFields { name: name.clone() }.validate()?;

    let mut properties = props! { "updatedAt" => now() };
    if let Some(name) = name {
        properties.insert("name".to_string(), Value::String(name));
    }
    if let Some(about) = changes.about {
        properties.insert("about".to_string(), about.map(Value::String).unwrap_or(Value::Null));
    }

    let user = ctx
        .store
        .update_node(Label::User, &changes.id, properties)
        .await?;

    info!(user_id = %changes.id, "User updated");
    Ok(user)
}

/// Soft delete an account and, for each listed kind, everything of that
/// kind the user wrote
pub async fn delete_user(
    ctx: &RequestContext,
    id: &str,
    resources: &[Deletable],
) -> ApiResult<Option<Node>> {
    let user_ref = NodeRef::user(id);

    let mut kinds: Vec<Deletable> = Vec::new();
    for kind in resources {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }

    for kind in kinds {
        let (label, relation) = match kind {
            Deletable::Post => (Label::Post, relations::user::CONTRIBUTIONS),
            Deletable::Comment => (Label::Comment, relations::user::COMMENTS),
        };
        let written = ctx.store.related(&user_ref, &relation).await?;
        for related in &written {
            soft_delete(ctx, label, related.node.id()).await?;
        }
        info!(user_id = %id, kind = ?kind, count = written.len(), "Deleted user resources");
    }

    let user = ctx
        .store
        .update_node(
            Label::User,
            id,
            props! {
                "deleted" => true,
                "name" => UNAVAILABLE,
                "about" => UNAVAILABLE,
                "updatedAt" => now(),
            },
        )
        .await?;

    info!(user_id = %id, "User deleted");
    Ok(user)
}
