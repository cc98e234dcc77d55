mod common;

use common::TestApp;
use graph_store::{GraphStore, Label};

#[tokio::test]
async fn test_disable_and_enable_post() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Text", &["cat1"]).await;

    let data = app
        .data(Some("moderator"), r#"mutation { disable(id: "p1") }"#)
        .await;
    assert_eq!(data["disable"], "p1");

    let listed = app.data(None, "{ Post { id } }").await;
    assert!(listed["Post"].as_array().unwrap().is_empty());

    let data = app
        .data(
            Some("moderator"),
            r#"{ Post(disabled: true) { id disabled disabledBy { id } } }"#,
        )
        .await;
    assert_eq!(data["Post"][0]["disabledBy"]["id"], "moderator");

    let data = app
        .data(Some("moderator"), r#"mutation { enable(id: "p1") }"#)
        .await;
    assert_eq!(data["enable"], "p1");
    let post = app.store.find_node(Label::Post, "p1").await.unwrap().unwrap();
    assert!(!post.flag("disabled"));

    let data = app
        .data(Some("moderator"), r#"mutation { enable(id: "p1") }"#)
        .await;
    assert!(data["enable"].is_null());
}

#[tokio::test]
async fn test_disable_and_enable_comment() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Text", &["cat1"]).await;
    app.create_comment("other", "c1", "p1").await;

    let data = app
        .data(Some("moderator"), r#"mutation { disable(id: "c1") }"#)
        .await;
    assert_eq!(data["disable"], "c1");

    let data = app.data(None, "{ Comment { id } }").await;
    assert!(data["Comment"].as_array().unwrap().is_empty());

    let data = app
        .data(
            Some("moderator"),
            r#"{ Comment(disabled: true) { id disabled disabledBy { id } } }"#,
        )
        .await;
    assert_eq!(data["Comment"][0]["id"], "c1");
    assert_eq!(data["Comment"][0]["disabled"], true);
    assert_eq!(data["Comment"][0]["disabledBy"]["id"], "moderator");

    let data = app
        .data(Some("moderator"), r#"mutation { enable(id: "c1") }"#)
        .await;
    assert_eq!(data["enable"], "c1");

    let data = app
        .data(
            Some("moderator"),
            r#"{ Comment(id: "c1") { disabled disabledBy { id } } }"#,
        )
        .await;
    assert_eq!(data["Comment"][0]["disabled"], false);
    assert!(data["Comment"][0]["disabledBy"].is_null());
}

#[tokio::test]
async fn test_disable_other_moderator_reassigns_edge() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Text", &["cat1"]).await;

    app.data(Some("moderator"), r#"mutation { disable(id: "p1") }"#)
        .await;
    app.data(Some("admin"), r#"mutation { disable(id: "p1") }"#)
        .await;

    let data = app
        .data(
            Some("admin"),
            r#"{ Post(disabled: true) { disabledBy { id } } }"#,
        )
        .await;
    assert_eq!(data["Post"][0]["disabledBy"]["id"], "admin");
}

#[tokio::test]
async fn test_disable_unsupported_or_missing_is_null() {
    let app = TestApp::new().await;

    let data = app
        .data(Some("moderator"), r#"mutation { disable(id: "cat1") }"#)
        .await;
    assert!(data["disable"].is_null());

    let data = app
        .data(Some("moderator"), r#"mutation { disable(id: "missing") }"#)
        .await;
    assert!(data["disable"].is_null());
}

#[tokio::test]
async fn test_moderator_cannot_disable_themselves() {
    let app = TestApp::new().await;
    let data = app
        .data(Some("moderator"), r#"mutation { disable(id: "moderator") }"#)
        .await;
    assert!(data["disable"].is_null());
}

#[tokio::test]
async fn test_disabled_user_is_anonymous() {
    let app = TestApp::new().await;
    app.data(Some("moderator"), r#"mutation { disable(id: "other") }"#)
        .await;

    let data = app.data(Some("other"), "{ currentUser { id } }").await;
    assert!(data["currentUser"].is_null());
}

#[tokio::test]
async fn test_report_fills_matching_field() {
    let app = TestApp::new().await;
    app.create_post("author", "p1", "Text", &["cat1"]).await;

    let data = app
        .data(
            Some("other"),
            r#"mutation { report(id: "p1", description: "Spam") { description type submitter { id } user { id } post { id } comment { id } } }"#,
        )
        .await;
    let report = &data["report"];
    assert_eq!(report["description"], "Spam");
    assert_eq!(report["type"], "Post");
    assert_eq!(report["submitter"]["id"], "other");
    assert_eq!(report["post"]["id"], "p1");
    assert!(report["user"].is_null());
    assert!(report["comment"].is_null());

    let data = app
        .data(Some("other"), r#"mutation { report(id: "cat1") { id } }"#)
        .await;
    assert!(data["report"].is_null());
}
