//! Moderation and reporting mutations

use async_graphql::{Context, Object, Result as GraphQLResult, ID};

use super::comment::Comment;
use super::post::Post;
use super::user::User;
use crate::context::request_context;
use crate::error::GraphQLResultExt;
use crate::model::ResourceKind;
use crate::permissions::{Operation, PermissionGuard};
use crate::services::moderation;
use crate::services::reports::{self, ReportedResource};

pub struct Report(pub reports::Report);

#[Object]
impl Report {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn created_at(&self) -> &str {
        &self.0.created_at
    }

    #[graphql(name = "type")]
    async fn kind(&self) -> ResourceKind {
        self.0.kind
    }

    async fn submitter(&self) -> User {
        User(self.0.submitter.clone())
    }

    async fn user(&self) -> Option<User> {
        match &self.0.resource {
            ReportedResource::User(node) => Some(User(node.clone())),
            _ => None,
        }
    }

    async fn post(&self) -> Option<Post> {
        match &self.0.resource {
            ReportedResource::Post(node) => Some(Post(node.clone())),
            _ => None,
        }
    }

    async fn comment(&self) -> Option<Comment> {
        match &self.0.resource {
            ReportedResource::Comment(node) => Some(Comment(node.clone())),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct ModerationMutation;

#[Object]
impl ModerationMutation {
    #[graphql(guard = "PermissionGuard::new(Operation::Disable)")]
    async fn disable(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<ID>> {
        let rc = request_context(ctx)?;
        let disabled = moderation::disable(rc, &id).await.extended()?;
        Ok(disabled.map(ID))
    }

    #[graphql(guard = "PermissionGuard::new(Operation::Enable)")]
    async fn enable(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<ID>> {
        let rc = request_context(ctx)?;
        let enabled = moderation::enable(rc, &id).await.extended()?;
        Ok(enabled.map(ID))
    }

    #[graphql(guard = "PermissionGuard::new(Operation::Report)")]
    async fn report(
        &self,
        ctx: &Context<'_>,
        id: ID,
        description: Option<String>,
    ) -> GraphQLResult<Option<Report>> {
        let rc = request_context(ctx)?;
        let report = reports::report(rc, &id, description).await.extended()?;
        Ok(report.map(Report))
    }
}
