//! Per-request context threaded through guards and services.

use crate::error::{ApiError, ApiResult};
use anyhow::Result;
use async_graphql::Enum;
use graph_store::{GraphStore, Label, Node};
use std::sync::Arc;
use tracing::debug;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[graphql(rename_items = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// Unknown or missing roles fall back to `user`
    pub fn from_property(value: Option<&str>) -> Self {
        match value {
            Some("moderator") => Role::Moderator,
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }
}

/// The authenticated caller, loaded from the user node
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub deleted: bool,
    pub disabled: bool,
}

impl Identity {
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            name: node.get_str("name").map(str::to_string),
            email: node.get_str("email").map(str::to_string),
            role: Role::from_property(node.get_str("role")),
            deleted: node.flag("deleted"),
            disabled: node.flag("disabled"),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted && !self.disabled
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[derive(Clone)]
pub struct RequestContext {
    pub store: Arc<dyn GraphStore>,
    pub user: Option<Identity>,
}

impl RequestContext {
    /// Deleted or disabled identities are dropped, leaving the request anonymous
    pub fn new(store: Arc<dyn GraphStore>, user: Option<Identity>) -> Self {
        Self {
            store,
            user: user.filter(Identity::is_active),
        }
    }

    pub fn anonymous(store: Arc<dyn GraphStore>) -> Self {
        Self { store, user: None }
    }

    /// Build the context for a token subject (the user id)
    pub async fn load(store: Arc<dyn GraphStore>, subject: Option<&str>) -> Result<Self> {
        let Some(user_id) = subject else {
            return Ok(Self::anonymous(store));
        };

        let user = store
            .find_node(Label::User, user_id)
            .await?
            .map(|node| Identity::from_node(&node));

        if user.is_none() {
            debug!(user_id = %user_id, "Token subject has no user node");
        }
        Ok(Self::new(store, user))
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }

    pub fn require_user(&self) -> ApiResult<&Identity> {
        self.user.as_ref().ok_or(ApiError::Authorization)
    }

    pub fn is_moderator(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.has_role(&[Role::Moderator, Role::Admin]))
    }
}

/// Fetch the request context attached to the GraphQL request
pub fn request_context<'a>(
    ctx: &'a async_graphql::Context<'_>,
) -> async_graphql::Result<&'a RequestContext> {
    ctx.data::<RequestContext>()
        .map_err(|_| "Request context not available".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_store::{props, MemoryStore};

    #[test]
    fn test_role_fallback() {
        assert_eq!(Role::from_property(Some("admin")), Role::Admin);
        assert_eq!(Role::from_property(Some("superuser")), Role::User);
        assert_eq!(Role::from_property(None), Role::User);
    }

    #[tokio::test]
    async fn test_disabled_user_is_anonymous() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_node(Label::User, props! { "id" => "u1", "disabled" => true })
            .await
            .unwrap();
        store
            .create_node(Label::User, props! { "id" => "u2", "role" => "moderator" })
            .await
            .unwrap();

        let ctx = RequestContext::load(store.clone(), Some("u1")).await.unwrap();
        assert!(ctx.user.is_none());

        let ctx = RequestContext::load(store.clone(), Some("u2")).await.unwrap();
        assert!(ctx.is_moderator());

        let ctx = RequestContext::load(store, Some("ghost")).await.unwrap();
        assert!(ctx.require_user().is_err());
    }
}
