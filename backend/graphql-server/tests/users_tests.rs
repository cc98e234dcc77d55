mod common;

use common::TestApp;
use graph_store::{GraphStore, Label};
use graphql_server::error::NOT_AUTHORISED;

#[tokio::test]
async fn test_update_user_validates_name() {
    let app = TestApp::new().await;

    let short = app
        .error(
            Some("author"),
            r#"mutation { UpdateUser(id: "author", name: " Al ") { id } }"#,
        )
        .await;
    assert_eq!(short, "\"name\" length must be at least 3 characters long");

    let null = app
        .error(
            Some("author"),
            r#"mutation { UpdateUser(id: "author", name: null) { id } }"#,
        )
        .await;
    assert_eq!(null, "\"name\" must be a string");

    let data = app
        .data(
            Some("author"),
            r#"mutation { UpdateUser(id: "author", name: "  Alice  ", about: "Hi") { name about } }"#,
        )
        .await;
    assert_eq!(data["UpdateUser"]["name"], "Alice");
    assert_eq!(data["UpdateUser"]["about"], "Hi");
}

#[tokio::test]
async fn test_update_other_account_denied() {
    let app = TestApp::new().await;
    let error = app
        .error(
            Some("other"),
            r#"mutation { UpdateUser(id: "author", name: "Mallory") { id } }"#,
        )
        .await;
    assert_eq!(error, NOT_AUTHORISED);
}

#[tokio::test]
async fn test_delete_user_removes_listed_resources_only() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Text", &["cat1"]).await;
    app.create_comment("author", "c1", "p1").await;

    let data = app
        .data(
            Some("author"),
            r#"mutation { DeleteUser(id: "author", resource: [Post, Post]) { id deleted name about } }"#,
        )
        .await;
    let user = &data["DeleteUser"];
    assert_eq!(user["deleted"], true);
    assert_eq!(user["name"], "UNAVAILABLE");
    assert_eq!(user["about"], "UNAVAILABLE");

    let post = app.store.find_node(Label::Post, "p1").await.unwrap().unwrap();
    assert!(post.flag("deleted"));
    assert_eq!(post.get_str("content"), Some("DELETED"));

    let comment = app
        .store
        .find_node(Label::Comment, "c1")
        .await
        .unwrap()
        .unwrap();
    assert!(!comment.flag("deleted"));
    assert_eq!(comment.get_str("content"), Some("A comment"));
}

/// Delete `author` owning post `p1` and comment `c1`, returning the
/// `deleted` flags of both as reported by the mutation
async fn delete_author_with(resource: &str) -> (bool, bool) {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Text", &["cat1"]).await;
    app.create_comment("author", "c1", "p1").await;

    let mutation = format!(
        r#"mutation {{ DeleteUser(id: "author"{}) {{ deleted contributions {{ id deleted }} comments {{ id deleted }} }} }}"#,
        resource
    );
    let data = app.data(Some("author"), &mutation).await;
    let user = &data["DeleteUser"];
    assert_eq!(user["deleted"], true);
    assert_eq!(user["contributions"][0]["id"], "p1");
    assert_eq!(user["comments"][0]["id"], "c1");
    (
        user["contributions"][0]["deleted"].as_bool().unwrap(),
        user["comments"][0]["deleted"].as_bool().unwrap(),
    )
}

#[tokio::test]
async fn test_delete_user_keeps_resources_by_default() {
    assert_eq!(delete_author_with("").await, (false, false));
}

#[tokio::test]
async fn test_delete_user_with_comments() {
    assert_eq!(delete_author_with(", resource: [Comment]").await, (false, true));
}

#[tokio::test]
async fn test_delete_user_with_posts() {
    assert_eq!(delete_author_with(", resource: [Post]").await, (true, false));
}

#[tokio::test]
async fn test_delete_user_with_posts_and_comments() {
    assert_eq!(
        delete_author_with(", resource: [Post, Comment]").await,
        (true, true)
    );
}

#[tokio::test]
async fn test_deleted_user_hidden_from_listing() {
    let app = TestApp::new().await;
    app.data(
        Some("other"),
        r#"mutation { DeleteUser(id: "other") { id } }"#,
    )
    .await;

    let data = app.data(None, r#"{ User(slug: "other") { id } }"#).await;
    assert!(data["User"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_current_user_and_counts() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Text", &["cat1"]).await;
    app.create_comment("author", "c1", "p1").await;

    let data = app
        .data(
            Some("author"),
            "{ currentUser { id role contributionsCount commentedCount contributions { id } } }",
        )
        .await;
    let me = &data["currentUser"];
    assert_eq!(me["id"], "author");
    assert_eq!(me["role"], "user");
    assert_eq!(me["contributionsCount"], 1);
    assert_eq!(me["commentedCount"], 1);
    assert_eq!(me["contributions"][0]["id"], "p1");
}
