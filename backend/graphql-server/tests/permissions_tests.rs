//! Authorization through the schema guards

mod common;

use common::TestApp;
use graph_store::{GraphStore, Label};
use graphql_server::error::NOT_AUTHORISED;

#[tokio::test]
async fn test_anonymous_cannot_create_post() {
    let app = TestApp::new().await;
    let error = app
        .error(
            None,
            r#"mutation { CreatePost(title: "Hello", content: "World", categoryIds: ["cat1"]) { id } }"#,
        )
        .await;
    assert_eq!(error, NOT_AUTHORISED);
}

#[tokio::test]
async fn test_non_owner_cannot_update_post() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Original", &["cat1"]).await;

    let error = app
        .error(
            Some("other"),
            r#"mutation { UpdatePost(id: "p1", title: "Hijacked") { id } }"#,
        )
        .await;
    assert_eq!(error, NOT_AUTHORISED);

    let post = app.store.find_node(Label::Post, "p1").await.unwrap().unwrap();
    assert_eq!(post.get_str("title"), Some("Post p1"));
}

#[tokio::test]
async fn test_owner_can_delete_post() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Original", &["cat1"]).await;

    let data = app
        .data(
            Some("author"),
            r#"mutation { DeletePost(id: "p1") { id deleted content } }"#,
        )
        .await;
    assert_eq!(data["DeletePost"]["deleted"], true);
    assert_eq!(data["DeletePost"]["content"], "DELETED");
}

#[tokio::test]
async fn test_missing_post_is_not_authorised() {
    let app = TestApp::new().await;
    let error = app
        .error(Some("author"), r#"mutation { DeletePost(id: "nope") { id } }"#)
        .await;
    assert_eq!(error, NOT_AUTHORISED);
}

#[tokio::test]
async fn test_disable_requires_moderator() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Original", &["cat1"]).await;

    let error = app
        .error(Some("other"), r#"mutation { disable(id: "p1") }"#)
        .await;
    assert_eq!(error, NOT_AUTHORISED);

    let post = app.store.find_node(Label::Post, "p1").await.unwrap().unwrap();
    assert!(!post.flag("disabled"));
}

#[tokio::test]
async fn test_email_filter_requires_admin() {
    let app = TestApp::new().await;

    let error = app
        .error(
            Some("other"),
            r#"{ User(email: "author@example.org") { id } }"#,
        )
        .await;
    assert_eq!(error, NOT_AUTHORISED);

    let data = app
        .data(
            Some("admin"),
            r#"{ User(email: "author@example.org") { id } }"#,
        )
        .await;
    assert_eq!(data["User"][0]["id"], "author");
}

#[tokio::test]
async fn test_email_field_visible_to_owner_only() {
    let app = TestApp::new().await;

    let data = app
        .data(Some("author"), r#"{ User(id: "author") { email } }"#)
        .await;
    assert_eq!(data["User"][0]["email"], "author@example.org");

    let error = app
        .error(Some("other"), r#"{ User(id: "author") { email } }"#)
        .await;
    assert_eq!(error, NOT_AUTHORISED);
}

#[tokio::test]
async fn test_error_carries_code_extension() {
    let app = TestApp::new().await;
    let response = app
        .execute(None, r#"mutation { follow(id: "author", type: User) }"#)
        .await;
    let error = serde_json::to_value(&response.errors[0]).unwrap();
    assert_eq!(error["extensions"]["code"], "UNAUTHORISED");
}
