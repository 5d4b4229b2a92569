mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn created_post_is_readable_by_anyone() {
    let app = TestApp::new().await;
    let token = app.signup("alice", "alice@example.com", "pw").await;

    let (status, created) = app
        .request(
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": "First", "content": "Hello there" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "First");
    assert_eq!(created["username"], "alice");

    let post_id = created["id"].as_i64().unwrap();
    let (status, fetched) = app.get(&format!("/api/posts/{post_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_post_requires_title_and_content() {
    let app = TestApp::new().await;
    let token = app.signup("alice", "alice@example.com", "pw").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": "", "content": "body" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and content are required");
    assert_eq!(app.count("SELECT COUNT(*) FROM posts").await, 0);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::new().await;
    let token = app.signup("alice", "alice@example.com", "pw").await;
    let first = app.create_post(&token, "one", "1").await;
    let second = app.create_post(&token, "two", "2").await;

    let (status, posts) = app.get("/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn unknown_or_malformed_post_id() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/posts/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Post not found");

    let (status, body) = app.get("/api/posts/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn non_owner_cannot_edit_or_delete() {
    let app = TestApp::new().await;
    let alice = app.signup("alice", "alice@example.com", "pw").await;
    let bob = app.signup("bob", "bob@example.com", "pw").await;
    let post_id = app.create_post(&alice, "Mine", "Original").await;
    let uri = format!("/api/posts/{post_id}");

    let (status, body) = app
        .request(
            Method::PUT,
            &uri,
            Some(&bob),
            Some(json!({ "title": "Hijacked", "content": "Gotcha" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You are not allowed to modify this post");

    let (status, _) = app.request(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, post) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "Mine");
    assert_eq!(post["content"], "Original");
    assert_eq!(post["username"], "alice");

    // Bob removing a like he never made is a harmless no-op.
    let (status, _) = app
        .request(Method::DELETE, &format!("{uri}/like"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn owner_can_edit_then_delete() {
    let app = TestApp::new().await;
    let alice = app.signup("alice", "alice@example.com", "pw").await;
    let post_id = app.create_post(&alice, "Draft", "v1").await;
    let uri = format!("/api/posts/{post_id}");

    let (status, updated) = app
        .request(
            Method::PUT,
            &uri,
            Some(&alice),
            Some(json!({ "title": "Final", "content": "v2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["content"], "v2");

    let (status, _) = app
        .request(
            Method::PUT,
            &uri,
            Some(&alice),
            Some(json!({ "title": "Final", "content": " " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.request(Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post deleted successfully!");

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutating_a_missing_post_is_not_found() {
    let app = TestApp::new().await;
    let alice = app.signup("alice", "alice@example.com", "pw").await;

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/posts/42",
            Some(&alice),
            Some(json!({ "title": "t", "content": "c" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(Method::DELETE, "/api/posts/42", Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_title_or_content_case_insensitively() {
    let app = TestApp::new().await;
    let token = app.signup("alice", "alice@example.com", "pw").await;
    let tips = app.create_post(&token, "Rust tips", "Borrow wisely").await;
    let pan = app.create_post(&token, "Cooking", "Season the rust off a pan").await;
    app.create_post(&token, "Gardening", "Tomatoes").await;

    let ids = |value: serde_json::Value| -> Vec<i64> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect()
    };

    let (status, found) = app.get("/api/posts/search?q=RUST", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(found), vec![pan, tips]);

    let (_, found) = app.get("/api/posts/search?q=tips", None).await;
    assert_eq!(ids(found), vec![tips]);

    let (_, found) = app.get("/api/posts/search?q=%25", None).await;
    assert!(ids(found).is_empty());

    let (_, found) = app.get("/api/posts/search?q=", None).await;
    assert_eq!(ids(found).len(), 3);
}

#[tokio::test]
async fn title_and_content_are_stored_trimmed() {
    let app = TestApp::new().await;
    let token = app.signup("alice", "alice@example.com", "pw").await;
    let post_id = app.create_post(&token, "  Spaced  ", "\n body \n").await;
    let uri = format!("/api/posts/{post_id}");

    let (_, post) = app.get(&uri, None).await;
    assert_eq!(post["title"], "Spaced");
    assert_eq!(post["content"], "body");

    let (status, updated) = app
        .request(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "title": " New ", "content": "  text  " })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["content"], "text");
}
