use async_graphql::{Context, Object, Result as GraphQLResult, ID};
use graph_store::Node;

use super::post::Post;
use super::prop;
use super::user::User;
use crate::context::request_context;
use crate::error::GraphQLResultExt;
use crate::permissions::{Operation, PermissionGuard};
use crate::relations;
use crate::resolver;
use crate::services::comments::{self, CommentDraft};

pub struct Comment(pub Node);

#[Object]
impl Comment {
    async fn id(&self) -> ID {
        ID(self.0.id().to_string())
    }

    async fn content(&self) -> Option<String> {
        prop(&self.0, "content")
    }

    async fn content_excerpt(&self) -> Option<String> {
        prop(&self.0, "contentExcerpt")
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

    async fn author(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let author = resolver::has_one(rc, &self.0.node_ref(), &relations::comment::AUTHOR)
            .await
            .extended()?;
        Ok(author.map(User))
    }

    async fn post(&self, ctx: &Context<'_>) -> GraphQLResult<Option<Post>> {
        let rc = request_context(ctx)?;
        let post = resolver::has_one(rc, &self.0.node_ref(), &relations::comment::POST)
            .await
            .extended()?;
        Ok(post.map(Post))
    }

    async fn disabled_by(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let moderator = resolver::has_one(rc, &self.0.node_ref(), &relations::comment::DISABLED_BY)
            .await
            .extended()?;
        Ok(moderator.map(User))
    }
}

#[derive(Default)]
pub struct CommentQuery;

#[Object]
impl CommentQuery {
    #[graphql(name = "Comment", guard = "PermissionGuard::new(Operation::Comment)")]
    async fn comment(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        disabled: Option<bool>,
    ) -> GraphQLResult<Vec<Comment>> {
        let rc = request_context(ctx)?;
        let found = comments::find_comments(rc, id.map(|id| id.0), disabled)
            .await
            .extended()?;
        Ok(found.into_iter().map(Comment).collect())
    }
}

#[derive(Default)]
pub struct CommentMutation;

#[Object]
impl CommentMutation {
    #[graphql(name = "CreateComment", guard = "PermissionGuard::new(Operation::CreateComment)")]
    async fn create_comment(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        post_id: ID,
        content: String,
    ) -> GraphQLResult<Comment> {
        let rc = request_context(ctx)?;
        let draft = CommentDraft {
            id: id.map(|id| id.0),
            post_id: post_id.0,
            content,
        };
        let comment = comments::create_comment(rc, draft).await.extended()?;
        Ok(Comment(comment))
    }

    #[graphql(
        name = "UpdateComment",
        guard = "PermissionGuard::new(Operation::UpdateComment { id: id.0.clone() })"
    )]
    async fn update_comment(
        &self,
        ctx: &Context<'_>,
        id: ID,
        content: String,
    ) -> GraphQLResult<Option<Comment>> {
        let rc = request_context(ctx)?;
        let comment = comments::update_comment(rc, &id, &content)
            .await
            .extended()?;
        Ok(comment.map(Comment))
    }

    #[graphql(
        name = "DeleteComment",
        guard = "PermissionGuard::new(Operation::DeleteComment { id: id.0.clone() })"
    )]
    async fn delete_comment(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<Comment>> {
        let rc = request_context(ctx)?;
        let comment = comments::delete_comment(rc, &id).await.extended()?;
        Ok(comment.map(Comment))
    }
}
