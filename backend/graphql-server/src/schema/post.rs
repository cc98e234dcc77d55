//! Post, Category, Tag and emotion schema

use async_graphql::{Context, InputObject, Object, Result as GraphQLResult, SimpleObject, ID};
use graph_store::Node;

use super::comment::Comment;
use super::prop;
use super::user::User;
use crate::context::request_context;
use crate::error::GraphQLResultExt;
use crate::model::Emotion;
use crate::permissions::{Operation, PermissionGuard};
use crate::relations;
use crate::resolver;
use crate::services::posts::{self, Emoted, PostChanges, PostDraft, PostQuery as PostSearch};

pub struct Post(pub Node);

#[Object]
impl Post {
    async fn id(&self) -> ID {
        ID(self.0.id().to_string())
    }

    async fn title(&self) -> Option<String> {
        prop(&self.0, "title")
    }

    async fn content(&self) -> Option<String> {
        prop(&self.0, "content")
    }

    async fn content_excerpt(&self) -> Option<String> {
        prop(&self.0, "contentExcerpt")
    }

    async fn slug(&self) -> Option<String> {
        prop(&self.0, "slug")
    }

    async fn language(&self) -> Option<String> {
        prop(&self.0, "language")
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
        let author = resolver::has_one(rc, &self.0.node_ref(), &relations::post::AUTHOR)
            .await
            .extended()?;
        Ok(author.map(User))
    }

    async fn disabled_by(&self, ctx: &Context<'_>) -> GraphQLResult<Option<User>> {
        let rc = request_context(ctx)?;
        let moderator = resolver::has_one(rc, &self.0.node_ref(), &relations::post::DISABLED_BY)
            .await
            .extended()?;
        Ok(moderator.map(User))
    }

    async fn tags(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Tag>> {
        let rc = request_context(ctx)?;
        let tags = resolver::has_many(rc, &self.0.node_ref(), &relations::post::TAGS)
            .await
            .extended()?;
        Ok(tags.into_iter().map(Tag).collect())
    }

    async fn categories(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Category>> {
        let rc = request_context(ctx)?;
        let categories = resolver::has_many(rc, &self.0.node_ref(), &relations::post::CATEGORIES)
            .await
            .extended()?;
        Ok(categories.into_iter().map(Category).collect())
    }

    async fn comments(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Comment>> {
        let rc = request_context(ctx)?;
        let comments = resolver::has_many(rc, &self.0.node_ref(), &relations::post::COMMENTS)
            .await
            .extended()?;
        Ok(comments.into_iter().map(Comment).collect())
    }

    async fn shouted_by(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<User>> {
        let rc = request_context(ctx)?;
        let users = resolver::has_many(rc, &self.0.node_ref(), &relations::post::SHOUTED_BY)
            .await
            .extended()?;
        Ok(users.into_iter().map(User).collect())
    }

    async fn emotions(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<EmotedEdge>> {
        let rc = request_context(ctx)?;
        let emotions = posts::emotions(rc, &self.0.node_ref()).await.extended()?;
        Ok(emotions.into_iter().map(EmotedEdge::new).collect())
    }

    async fn comments_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        let rc = request_context(ctx)?;
        resolver::count(rc, &self.0.node_ref(), &relations::post::ACTIVE_COMMENTS)
            .await
            .extended()
    }

    async fn shouted_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        let rc = request_context(ctx)?;
        resolver::count(rc, &self.0.node_ref(), &relations::post::SHOUTED_BY)
            .await
            .extended()
    }

    async fn emotions_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        let rc = request_context(ctx)?;
        resolver::count(rc, &self.0.node_ref(), &relations::post::EMOTIONS)
            .await
            .extended()
    }

    async fn shouted_by_current_user(&self, ctx: &Context<'_>) -> GraphQLResult<bool> {
        let rc = request_context(ctx)?;
        resolver::current_user_related(rc, &self.0.node_ref(), &relations::post::SHOUTED_BY)
            .await
            .extended()
    }

    async fn related_contributions(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let rc = request_context(ctx)?;
        let related = posts::related_contributions(rc, &self.0.node_ref())
            .await
            .extended()?;
        Ok(related.into_iter().map(Post).collect())
    }
}

pub struct Category(pub Node);

#[Object]
impl Category {
    async fn id(&self) -> ID {
        ID(self.0.id().to_string())
    }

    async fn name(&self) -> Option<String> {
        prop(&self.0, "name")
    }

    async fn slug(&self) -> Option<String> {
        prop(&self.0, "slug")
    }

    async fn icon(&self) -> Option<String> {
        prop(&self.0, "icon")
    }

    async fn posts_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        let rc = request_context(ctx)?;
        resolver::count(rc, &self.0.node_ref(), &relations::category::POSTS)
            .await
            .extended()
    }
}

pub struct Tag(pub Node);

#[Object]
impl Tag {
    async fn id(&self) -> ID {
        ID(self.0.id().to_string())
    }

    async fn tagged_count(&self, ctx: &Context<'_>) -> GraphQLResult<i64> {
        let rc = request_context(ctx)?;
        resolver::count(rc, &self.0.node_ref(), &relations::tag::POSTS)
            .await
            .extended()
    }
}

#[derive(SimpleObject)]
#[graphql(name = "EMOTED")]
pub struct EmotedEdge {
    pub from: User,
    pub to: Post,
    pub emotion: Emotion,
}

impl EmotedEdge {
    fn new(emoted: Emoted) -> Self {
        Self {
            from: User(emoted.from),
            to: Post(emoted.to),
            emotion: emoted.emotion,
        }
    }
}

#[derive(InputObject)]
#[graphql(name = "_PostInput")]
pub struct PostInput {
    pub id: ID,
}

#[derive(InputObject)]
#[graphql(name = "_EMOTEDInput")]
pub struct EmotedInput {
    pub emotion: Emotion,
}

#[derive(InputObject, Default)]
#[graphql(name = "_CategoryFilter")]
pub struct CategoryFilter {
    #[graphql(name = "id_in")]
    pub id_in: Option<Vec<ID>>,
}

#[derive(InputObject, Default)]
#[graphql(name = "_PostFilter")]
pub struct PostFilter {
    /// Posts in at least one matching category
    #[graphql(name = "categories_some")]
    pub categories_some: Option<CategoryFilter>,
}

impl PostFilter {
    fn category_ids(self) -> Option<Vec<String>> {
        self.categories_some
            .and_then(|categories| categories.id_in)
            .map(|ids| ids.into_iter().map(|id| id.0).collect())
    }
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    #[graphql(name = "Post", guard = "PermissionGuard::new(Operation::Post)")]
    async fn post(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        slug: Option<String>,
        disabled: Option<bool>,
        filter: Option<PostFilter>,
    ) -> GraphQLResult<Vec<Post>> {
        let rc = request_context(ctx)?;
        let search = PostSearch {
            id: id.map(|id| id.0),
            slug,
            disabled,
            category_ids: filter.and_then(PostFilter::category_ids),
        };
        let found = posts::find_posts(rc, search).await.extended()?;
        Ok(found.into_iter().map(Post).collect())
    }

    /// Case-insensitive substring search over post titles and content
    #[graphql(guard = "PermissionGuard::new(Operation::FindPosts)")]
    async fn find_posts(
        &self,
        ctx: &Context<'_>,
        query: String,
        #[graphql(validator(minimum = 1, maximum = 100))] limit: Option<i32>,
    ) -> GraphQLResult<Vec<Post>> {
        let rc = request_context(ctx)?;
        let limit = limit.map(|limit| limit as usize);
        let found = posts::search_posts(rc, &query, limit).await.extended()?;
        Ok(found.into_iter().map(Post).collect())
    }

    #[graphql(name = "Category", guard = "PermissionGuard::new(Operation::Category)")]
    async fn category(&self, ctx: &Context<'_>, id: Option<ID>) -> GraphQLResult<Vec<Category>> {
        let rc = request_context(ctx)?;
        let found = posts::find_categories(rc, id.map(|id| id.0))
            .await
            .extended()?;
        Ok(found.into_iter().map(Category).collect())
    }

    #[graphql(name = "Tag", guard = "PermissionGuard::new(Operation::Tag)")]
    async fn tag(&self, ctx: &Context<'_>, id: Option<ID>) -> GraphQLResult<Vec<Tag>> {
        let rc = request_context(ctx)?;
        let found = posts::find_tags(rc, id.map(|id| id.0)).await.extended()?;
        Ok(found.into_iter().map(Tag).collect())
    }

    #[graphql(
        name = "PostsEmotionsCountByEmotion",
        guard = "PermissionGuard::new(Operation::PostsEmotionsCountByEmotion)"
    )]
    async fn posts_emotions_count_by_emotion(
        &self,
        ctx: &Context<'_>,
        post_id: ID,
        data: EmotedInput,
    ) -> GraphQLResult<i64> {
        let rc = request_context(ctx)?;
        posts::emotions_count_by_emotion(rc, &post_id, data.emotion)
            .await
            .extended()
    }

    #[graphql(
        name = "PostsEmotionsByCurrentUser",
        guard = "PermissionGuard::new(Operation::PostsEmotionsByCurrentUser)"
    )]
    async fn posts_emotions_by_current_user(
        &self,
        ctx: &Context<'_>,
        post_id: ID,
    ) -> GraphQLResult<Vec<Emotion>> {
        let rc = request_context(ctx)?;
        posts::emotions_by_current_user(rc, &post_id)
            .await
            .extended()
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    #[graphql(name = "CreatePost", guard = "PermissionGuard::new(Operation::CreatePost)")]
    async fn create_post(
        &self,
        ctx: &Context<'_>,
        id: Option<ID>,
        title: String,
        content: String,
        language: Option<String>,
        category_ids: Option<Vec<ID>>,
    ) -> GraphQLResult<Post> {
        let rc = request_context(ctx)?;
        let draft = PostDraft {
            id: id.map(|id| id.0),
            title,
            content,
            language,
            category_ids: category_ids.map(|ids| ids.into_iter().map(|id| id.0).collect()),
        };
        let post = posts::create_post(rc, draft).await.extended()?;
        Ok(Post(post))
    }

    #[graphql(
        name = "UpdatePost",
        guard = "PermissionGuard::new(Operation::UpdatePost { id: id.0.clone() })"
    )]
    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        content: Option<String>,
        language: Option<String>,
        category_ids: Option<Vec<ID>>,
    ) -> GraphQLResult<Option<Post>> {
        let rc = request_context(ctx)?;
        let changes = PostChanges {
            id: id.0,
            title,
            content,
            language,
            category_ids: category_ids.map(|ids| ids.into_iter().map(|id| id.0).collect()),
        };
        let post = posts::update_post(rc, changes).await.extended()?;
        Ok(post.map(Post))
    }

    #[graphql(
        name = "DeletePost",
        guard = "PermissionGuard::new(Operation::DeletePost { id: id.0.clone() })"
    )]
    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Option<Post>> {
        let rc = request_context(ctx)?;
        let post = posts::delete_post(rc, &id).await.extended()?;
        Ok(post.map(Post))
    }

    #[graphql(
        name = "AddPostEmotions",
        guard = "PermissionGuard::new(Operation::AddPostEmotions)"
    )]
    async fn add_post_emotions(
        &self,
        ctx: &Context<'_>,
        to: PostInput,
        data: EmotedInput,
    ) -> GraphQLResult<Option<EmotedEdge>> {
        let rc = request_context(ctx)?;
        let emoted = posts::add_emotion(rc, &to.id, data.emotion).await.extended()?;
        Ok(emoted.map(EmotedEdge::new))
    }

    #[graphql(
        name = "RemovePostEmotions",
        guard = "PermissionGuard::new(Operation::RemovePostEmotions)"
    )]
    async fn remove_post_emotions(
        &self,
        ctx: &Context<'_>,
        to: PostInput,
        data: EmotedInput,
    ) -> GraphQLResult<Option<EmotedEdge>> {
        let rc = request_context(ctx)?;
        let emoted = posts::remove_emotion(rc, &to.id, data.emotion)
            .await
            .extended()?;
        Ok(emoted.map(EmotedEdge::new))
    }
}
