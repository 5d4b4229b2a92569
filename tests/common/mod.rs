//! In-memory fixtures for driving the full router without a network socket.

#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use blog::{auth::TokenKeys, db, rest, AppState};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Fresh in-memory database with migrations applied.
    pub async fn new() -> Self {
        let pool = db::connect_in_memory()
            .await
            .expect("Failed to open in-memory database");
        db::migrate(&pool).await.expect("Failed to run migrations");

        let state = AppState {
            db: pool,
            tokens: TokenKeys::from_secret(TEST_SECRET, Duration::from_secs(3600)),
        };

        Self {
            router: rest::router(state.clone()),
            state,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> StatusCode {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.request(Method::POST, "/api/register", None, Some(body))
            .await
            .0
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({ "email": email, "password": password });
        let (status, json) = self
            .request(Method::POST, "/api/login", None, Some(body))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {json}");
        json["token"].as_str().unwrap().to_string()
    }

    /// Registers and logs in, returning the bearer token.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> String {
        assert_eq!(
            self.register(username, email, password).await,
            StatusCode::CREATED
        );
        self.login(email, password).await
    }

    pub async fn create_post(&self, token: &str, title: &str, content: &str) -> i64 {
        let body = serde_json::json!({ "title": title, "content": content });
        let (status, json) = self
            .request(Method::POST, "/api/posts", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create post failed: {json}");
        json["id"].as_i64().unwrap()
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.state.db)
            .await
            .unwrap()
    }
}
