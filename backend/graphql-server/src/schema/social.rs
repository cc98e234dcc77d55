use async_graphql::{Context, Object, Result as GraphQLResult, ID};

use super::user::User;
use crate::context::request_context;
use crate::error::GraphQLResultExt;
use crate::model::{FollowType, ShoutType};
use crate::permissions::{Operation, PermissionGuard};
use crate::services::social;

#[derive(Default)]
pub struct SocialMutation;

#[Object]
impl SocialMutation {
    #[graphql(guard = "PermissionGuard::new(Operation::Follow)")]
    async fn follow(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(name = "type")] follow_type: FollowType,
    ) -> GraphQLResult<bool> {
        let rc = request_context(ctx)?;
        social::follow(rc, &id, follow_type).await.extended()
    }

    #[graphql(guard = "PermissionGuard::new(Operation::Unfollow)")]
    async fn unfollow(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(name = "type")] follow_type: FollowType,
    ) -> GraphQLResult<bool> {
        let rc = request_context(ctx)?;
        social::unfollow(rc, &id, follow_type).await.extended()
    }

    #[graphql(guard = "PermissionGuard::new(Operation::Shout)")]
    async fn shout(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(name = "type")] shout_type: ShoutType,
    ) -> GraphQLResult<bool> {
        let rc = request_context(ctx)?;
        social::shout(rc, &id, shout_type).await.extended()
    }

    #[graphql(guard = "PermissionGuard::new(Operation::Unshout)")]
    async fn unshout(
        &self,
        ctx: &Context<'_>,
        id: ID,
        #[graphql(name = "type")] shout_type: ShoutType,
    ) -> GraphQLResult<bool> {
        let rc = request_context(ctx)?;
        social::unshout(rc, &id, shout_type).await.extended()
    }

    #[graphql(guard = "PermissionGuard::new(Operation::Block)")]
    async fn block(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let blocked = social::block(rc, &id).await.extended()?;
        Ok(blocked.map(User))
    }

    #[graphql(guard = "PermissionGuard::new(Operation::Unblock)")]
    async fn unblock(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let unblocked = social::unblock(rc, &id).await.extended()?;
        Ok(unblocked.map(User))
    }
}
