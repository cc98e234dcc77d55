//! Authorization layer
//!
//! Every GraphQL operation maps to an [`Operation`], and [`policy_for`]
//! assigns each one a [`Policy`]. The mapping is an exhaustive `match`, so
//! adding an operation without deciding its policy does not compile.
//!
//! [`PermissionGuard`] evaluates the policy as an `async-graphql` field guard,
//! which runs before the resolver. A rejected call fails with
//! `Not Authorised!` and has no side effects beyond the ownership read.

use crate::context::{request_context, RequestContext, Role};
use crate::error::{ApiError, ApiResult};
use crate::relations;
use async_graphql::{Context, ErrorExtensions, Guard};
use graph_store::NodeRef;
use tracing::{debug, warn};

const MODERATORS: &[Role] = &[Role::Moderator, Role::Admin];
const ADMINS: &[Role] = &[Role::Admin];

/// An operation together with the arguments authorization needs
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    // Queries
    Post,
    FindPosts,
    Comment,
    User { email_filter: bool },
    CurrentUser,
    Category,
    Tag,
    PostsEmotionsCountByEmotion,
    PostsEmotionsByCurrentUser,
    BlockedUsers,
    UserEmail { user_id: String },

    // Mutations
    CreatePost,
    UpdatePost { id: String },
    DeletePost { id: String },
    AddPostEmotions,
    RemovePostEmotions,
    CreateComment,
    UpdateComment { id: String },
    DeleteComment { id: String },
    Follow,
    Unfollow,
    Shout,
    Unshout,
    Block,
    Unblock,
    Disable,
    Enable,
    Report,
    UpdateUser { id: String },
    DeleteUser { id: String },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Post => "Post",
            Operation::FindPosts => "findPosts",
            Operation::Comment => "Comment",
            Operation::User { .. } => "User",
            Operation::CurrentUser => "currentUser",
            Operation::Category => "Category",
            Operation::Tag => "Tag",
            Operation::PostsEmotionsCountByEmotion => "PostsEmotionsCountByEmotion",
            Operation::PostsEmotionsByCurrentUser => "PostsEmotionsByCurrentUser",
            Operation::BlockedUsers => "blockedUsers",
            Operation::UserEmail { .. } => "User.email",
            Operation::CreatePost => "CreatePost",
            Operation::UpdatePost { .. } => "UpdatePost",
            Operation::DeletePost { .. } => "DeletePost",
            Operation::AddPostEmotions => "AddPostEmotions",
            Operation::RemovePostEmotions => "RemovePostEmotions",
            Operation::CreateComment => "CreateComment",
            Operation::UpdateComment { .. } => "UpdateComment",
            Operation::DeleteComment { .. } => "DeleteComment",
            Operation::Follow => "follow",
            Operation::Unfollow => "unfollow",
            Operation::Shout => "shout",
            Operation::Unshout => "unshout",
            Operation::Block => "block",
            Operation::Unblock => "unblock",
            Operation::Disable => "disable",
            Operation::Enable => "enable",
            Operation::Report => "report",
            Operation::UpdateUser { .. } => "UpdateUser",
            Operation::DeleteUser { .. } => "DeleteUser",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Policy {
    /// Always allowed
    Public,
    /// Any active identity
    Authenticated,
    /// Caller wrote the target Post or Comment
    Owner(NodeRef),
    /// Caller is the target user
    OwnAccount(String),
    /// Caller's role is in the list
    Role(&'static [Role]),
    /// Caller is the target user or has one of the roles
    OwnAccountOrRole {
        user_id: String,
        roles: &'static [Role],
    },
}

pub fn policy_for(operation: &Operation) -> Policy {
    match operation {
        Operation::Post
        | Operation::FindPosts
        | Operation::Comment
        | Operation::User {
            email_filter: false,
        }
        | Operation::CurrentUser
        | Operation::Category
        | Operation::Tag
        | Operation::PostsEmotionsCountByEmotion => Policy::Public,

        Operation::User { email_filter: true } => Policy::Role(ADMINS),

        Operation::PostsEmotionsByCurrentUser
        | Operation::BlockedUsers
        | Operation::CreatePost
        | Operation::CreateComment
        | Operation::AddPostEmotions
        | Operation::RemovePostEmotions
        | Operation::Follow
        | Operation::Unfollow
        | Operation::Shout
        | Operation::Unshout
        | Operation::Block
        | Operation::Unblock
        | Operation::Report => Policy::Authenticated,

        Operation::UpdatePost { id } | Operation::DeletePost { id } => {
            Policy::Owner(NodeRef::post(id.clone()))
        }
        Operation::UpdateComment { id } | Operation::DeleteComment { id } => {
            Policy::Owner(NodeRef::comment(id.clone()))
        }

        Operation::UpdateUser { id } | Operation::DeleteUser { id } => {
            Policy::OwnAccount(id.clone())
        }

        Operation::Disable | Operation::Enable => Policy::Role(MODERATORS),

        Operation::UserEmail { user_id } => Policy::OwnAccountOrRole {
            user_id: user_id.clone(),
            roles: ADMINS,
        },
    }
}

/// Evaluate the policy for `operation` against the caller in `ctx`
pub async fn authorize(ctx: &RequestContext, operation: &Operation) -> ApiResult<()> {
    let allowed = match (policy_for(operation), ctx.user.as_ref()) {
        (Policy::Public, _) => true,
        (_, None) => false,
        (Policy::Authenticated, Some(_)) => true,
        (Policy::Owner(target), Some(user)) => {
            ctx.store
                .is_related(&target, &relations::AUTHOR, &user.id)
                .await?
        }
        (Policy::OwnAccount(user_id), Some(user)) => user.id == user_id,
        (Policy::Role(roles), Some(user)) => user.has_role(roles),
        (Policy::OwnAccountOrRole { user_id, roles }, Some(user)) => {
            user.id == user_id || user.has_role(roles)
        }
    };

    let user_id = ctx.user_id().unwrap_or("anonymous");
    if allowed {
        debug!(operation = operation.name(), user_id = %user_id, "Authorized");
        Ok(())
    } else {
        warn!(operation = operation.name(), user_id = %user_id, "Not authorised");
        Err(ApiError::Authorization)
    }
}

/// Field guard running [`authorize`] before the resolver
pub struct PermissionGuard {
    operation: Operation,
}

impl PermissionGuard {
    pub fn new(operation: Operation) -> Self {
        Self { operation }
    }
}

impl Guard for PermissionGuard {
    async fn check(&self, ctx: &Context<'_>) -> async_graphql::Result<()> {
        let request = request_context(ctx)?;
        authorize(request, &self.operation)
            .await
            .map_err(|e| e.extend())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Identity;
    use graph_store::{props, EdgeKind, GraphStore, Label, MemoryStore, Properties};
    use std::sync::Arc;

    fn identity(id: &str, role: Role) -> Identity {
        Identity {
            id: id.to_string(),
            name: None,
            email: None,
            role,
            deleted: false,
            disabled: false,
        }
    }

    async fn store_with_post() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .create_node(Label::User, props! { "id" => "author" })
            .await
            .unwrap();
        store
            .create_node(Label::Post, props! { "id" => "p1" })
            .await
            .unwrap();
        store
            .merge_edge(
                &NodeRef::user("author"),
                EdgeKind::Wrote,
                &NodeRef::post("p1"),
                Properties::new(),
            )
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(policy_for(&Operation::Post), Policy::Public);
        assert_eq!(policy_for(&Operation::FindPosts), Policy::Public);
        assert_eq!(
            policy_for(&Operation::User { email_filter: true }),
            Policy::Role(ADMINS)
        );
        assert_eq!(policy_for(&Operation::CreatePost), Policy::Authenticated);
        assert_eq!(
            policy_for(&Operation::DeleteComment { id: "c1".into() }),
            Policy::Owner(NodeRef::comment("c1"))
        );
        assert_eq!(
            policy_for(&Operation::DeleteUser { id: "u1".into() }),
            Policy::OwnAccount("u1".into())
        );
        assert_eq!(policy_for(&Operation::Enable), Policy::Role(MODERATORS));
    }

    #[tokio::test]
    async fn test_owner_policy_reads_author_edge() {
        let store = store_with_post().await;
        let operation = Operation::UpdatePost { id: "p1".into() };

        let owner = RequestContext::new(store.clone(), Some(identity("author", Role::User)));
        assert!(authorize(&owner, &operation).await.is_ok());

        let stranger = RequestContext::new(store.clone(), Some(identity("other", Role::User)));
        assert!(matches!(
            authorize(&stranger, &operation).await,
            Err(ApiError::Authorization)
        ));

        // moderators do not own other people's posts
        let moderator = RequestContext::new(store, Some(identity("mod", Role::Moderator)));
        assert!(authorize(&moderator, &operation).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_resource_fails_closed() {
        let store = store_with_post().await;
        let owner = RequestContext::new(store, Some(identity("author", Role::User)));
        let result = authorize(&owner, &Operation::DeletePost { id: "missing".into() }).await;
        assert!(matches!(result, Err(ApiError::Authorization)));
    }

    #[tokio::test]
    async fn test_anonymous_only_reaches_public() {
        let ctx = RequestContext::anonymous(store_with_post().await);
        assert!(authorize(&ctx, &Operation::Post).await.is_ok());
        assert!(authorize(&ctx, &Operation::CreateComment).await.is_err());
        assert!(authorize(&ctx, &Operation::Disable).await.is_err());
    }

    #[tokio::test]
    async fn test_email_visible_to_self_and_admin() {
        let store = store_with_post().await;
        let operation = Operation::UserEmail {
            user_id: "u1".into(),
        };

        let own = RequestContext::new(store.clone(), Some(identity("u1", Role::User)));
        let admin = RequestContext::new(store.clone(), Some(identity("root", Role::Admin)));
        let moderator = RequestContext::new(store, Some(identity("mod", Role::Moderator)));

        assert!(authorize(&own, &operation).await.is_ok());
        assert!(authorize(&admin, &operation).await.is_ok());
        assert!(authorize(&moderator, &operation).await.is_err());
    }
}
