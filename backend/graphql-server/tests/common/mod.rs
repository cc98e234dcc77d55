//! Shared fixtures: a seeded in-memory graph and a schema to run documents against

#![allow(dead_code)]

use async_graphql::{Request, Response};
use graph_store::{props, GraphStore, Label, MemoryStore};
use graphql_server::config::GraphQLConfig;
use graphql_server::services::seed::seed_categories;
use graphql_server::{build_schema, AppSchema, RequestContext};
use serde_json::Value;
use std::sync::Arc;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub schema: AppSchema,
}

impl TestApp {
    /// Users `author`, `other`, `moderator` and `admin`, plus the default categories
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        seed_categories(store.as_ref()).await.unwrap();

        for (id, name, role) in [
            ("author", "Alice Author", "user"),
            ("other", "Oscar Other", "user"),
            ("moderator", "Mona Moderator", "moderator"),
            ("admin", "Adam Admin", "admin"),
        ] {
            store
                .create_node(
                    Label::User,
                    props! {
                        "id" => id,
                        "name" => name,
                        "slug" => id,
                        "email" => format!("{}@example.org", id),
                        "role" => role,
                        "deleted" => false,
                        "disabled" => false,
                    },
                )
                .await
                .unwrap();
        }

        Self {
            store,
            schema: build_schema(&GraphQLConfig::default()),
        }
    }

    pub async fn execute(&self, user: Option<&str>, query: &str) -> Response {
        let store: Arc<dyn GraphStore> = self.store.clone();
        let ctx = RequestContext::load(store, user).await.unwrap();
        self.schema.execute(Request::new(query).data(ctx)).await
    }

    /// Run a document that must succeed and return its data
    pub async fn data(&self, user: Option<&str>, query: &str) -> Value {
        let response = self.execute(user, query).await;
        assert!(
            response.errors.is_empty(),
            "unexpected errors: {:?}",
            response.errors
        );
        response.data.into_json().unwrap()
    }

    /// Run a document that must fail and return the first error message
    pub async fn error(&self, user: Option<&str>, query: &str) -> String {
        let response = self.execute(user, query).await;
        assert!(!response.errors.is_empty(), "expected an error");
        response.errors[0].message.clone()
    }

    /// Create post `id` as `user` in the given categories
    pub async fn create_post(&self, user: &str, id: &str, content: &str, categories: &[&str]) {
        let ids = categories
            .iter()
            .map(|id| format!("\"{}\"", id))
            .collect::<Vec<_>>()
            .join(", ");
        let mutation = format!(
            r#"mutation {{ CreatePost(id: "{}", title: "Post {}", content: "{}", categoryIds: [{}]) {{ id }} }}"#,
            id, id, content, ids
        );
        self.data(Some(user), &mutation).await;
    }

    pub async fn create_comment(&self, user: &str, id: &str, post_id: &str) {
        let mutation = format!(
            r#"mutation {{ CreateComment(id: "{}", postId: "{}", content: "A comment") {{ id }} }}"#,
            id, post_id
        );
        self.data(Some(user), &mutation).await;
    }
}
