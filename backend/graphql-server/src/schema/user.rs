use async_graphql::{Context, MaybeUndefined, Object, Result as GraphQLResult, ID};
use graph_store::{Node, Relation};

use super::comment::Comment;
use super::post::Post;
use super::prop;
use crate::context::{request_context, Role};
use crate::error::GraphQLResultExt;
use crate::model::Deletable;
use crate::permissions::{authorize, Operation, PermissionGuard};
use crate::relations;
use crate::resolver;
use crate::services::{social, users};

pub struct User(pub Node);

impl User {
    async fn count(&self, ctx: &Context<'_>, relation: &Relation) -> GraphQLResult<i64> {
        let rc = request_context(ctx)?;
        resolver::count(rc, &self.0.node_ref(), relation)
            .await
            .extended()
    }

    async fn users(&self, ctx: &Context<'_>, relation: &Relation) -> GraphQLResult<Vec<User>> {
        let rc = request_context(ctx)?;
        let users = resolver::has_many(rc, &self.0.node_ref(), relation)
            .await
            .extended()?;
        Ok(users.into_iter().map(User).collect())
    }
}

#[Object]
impl User {
    async fn id(&self) -> ID {
        ID(self.0.id().to_string())
    }

    async fn name(&self) -> Option<String> {
        prop(&self.0, "name")
    }

    async fn slug(&self) -> Option<String> {
        prop(&self.0, "slug")
    }

    async fn about(&self) -> Option<String> {
        prop(&self.0, "about")
    }

    async fn role(&self) -> Role {
        Role::from_property(self.0.get_str("role"))
    }

    /// Visible to the account owner and admins
    async fn email(&self, ctx: &Context<'_>) -> GraphQLResult<Option<String>> {
        let rc = request_context(ctx)?;
        let operation = Operation::UserEmail {
            user_id: self.0.id().to_string(),
        };
        authorize(rc, &operation).await.extended()?;
        Ok(prop(&self.0, "email"))
    }

    async fn deleted(&self) -> bool {
        self.0.flag("deleted")
    }

    async fn disabled(&self) -> bool {
        self.0.flag("disabled")
    }

    async fn created_at(&self) -> Option<String> {
        prop(&self.0, "createdAt")
    }

    async fn updated_at(&self) -> Option<String> {
        prop(&self.0, "updatedAt")
    }

    async fn contributions(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let rc = request_context(ctx)?;
        let posts = resolver::has_many(rc, &self.0.node_ref(), &relations::user::CONTRIBUTIONS)
            .await
            .extended()?;
        Ok(posts.into_iter().map(Post).collect())
    }

    async fn comments(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Comment>> {
        let rc = request_context(ctx)?;
        let comments = resolver::has_many(rc, &self.0.node_ref(), &relations::user::COMMENTS)
            .await
            .extended()?;
        Ok(comments.into_iter().map(Comment).collect())
    }

    async fn followed_by(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<User>> {
        self.users(ctx, &relations::user::FOLLOWED_BY).await
    }

    async fn following(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<User>> {
        self.users(ctx, &relations::user::FOLLOWING).await
    }

    async fn shouted(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let rc = request_context(ctx)?;
        let posts = resolver::has_many(rc, &self.0.node_ref(), &relations::user::SHOUTED)
            .await
            .extended()?;
        Ok(posts.into_iter().map(Post).collect())
    }

    async fn contributions_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        self.count(ctx, &relations::user::ACTIVE_CONTRIBUTIONS).await
    }

    async fn commented_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        self.count(ctx, &relations::user::ACTIVE_COMMENTS).await
    }

    async fn followed_by_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        self.count(ctx, &relations::user::FOLLOWED_BY).await
    }

    async fn following_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        self.count(ctx, &relations::user::FOLLOWING).await
    }

    async fn shouted_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        self.count(ctx, &relations::user::SHOUTED).await
    }

    async fn followed_by_current_user(&self, ctx: &Context<'_>) -> GraphQLResult<bool> {
        let rc = request_context(ctx)?;
        resolver::current_user_related(rc, &self.0.node_ref(), &relations::user::FOLLOWED_BY)
            .await
            .extended()
    }

    /// Whether the caller blocked this user
    async fn is_blocked(&self, ctx: &Context<'_>) -> GraphQLResult<bool> {
        let rc = request_context(ctx)?;
        social::is_blocked(rc, self.0.id()).await.extended()
    }

    async fn disabled_by(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let moderator = resolver::has_one(rc, &self.0.node_ref(), &relations::user::DISABLED_BY)
            .await
            .extended()?;
        Ok(moderator.map(User))
    }
}

fn changed(value: MaybeUndefined<String>) -> Option<Option<String>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(value) => Some(Some(value)),
    }
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    #[graphql(
        name = "User",
        guard = "PermissionGuard::new(Operation::User { email_filter: email.is_some() })"
    )]
    async fn user(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        name: Option<String>,
        email: Option<String>,
        slug: Option<String>,
        disabled: Option<bool>,
    ) -> GraphQLResult<Vec<User>> {
        let rc = request_context(ctx)?;
        let query = users::UserQuery {
            id: id.map(|id| id.0),
            name,
            email,
            slug,
            disabled,
        };
        let found = users::find_users(rc, query).await.extended()?;
        Ok(found.into_iter().map(User).collect())
    }

    #[graphql(guard = "PermissionGuard::new(Operation::CurrentUser)")]
    async fn current_user(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let user = users::current_user(rc).await.extended()?;
        Ok(user.map(User))
    }

    #[graphql(guard = "PermissionGuard::new(Operation::BlockedUsers)")]
    async fn blocked_users(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<User>> {
        let rc = request_context(ctx)?;
        let blocked = social::blocked_users(rc).await.extended()?;
        Ok(blocked.into_iter().map(User).collect())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    #[graphql(
        name = "UpdateUser",
        guard = "PermissionGuard::new(Operation::UpdateUser { id: id.0.clone() })"
    )]
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: MaybeUndefined<String>,
        about: MaybeUndefined<String>,
    ) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let changes = users::UserChanges {
            id: id.0,
            name: changed(name),
            about: changed(about),
        };
        let user = users::update_user(rc, changes).await.extended()?;
        Ok(user.map(User))
    }

    #[graphql(
        name = "DeleteUser",
        guard = "PermissionGuard::new(Operation::DeleteUser { id: id.0.clone() })"
    )]
    async fn delete_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        resource: Option<Vec<Deletable>>,
    ) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let user = users::delete_user(rc, &id, &resource.unwrap_or_default())
            .await
            .extended()?;
        Ok(user.map(User))
    }
}
