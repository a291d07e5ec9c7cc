#![allow(dead_code)]

//! Common test utilities for integration tests
//!
//! Every test builds its own router over fresh in-memory repositories, so
//! tests are independent and need no database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bazaar_api::app::{build_router, AppState};
use bazaar_api::config::Config;
use bazaar_shared::auth::password::hash_password;
use bazaar_shared::models::{Account, NewAccount};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Test context: application state plus the router built from it
pub struct TestContext {
    pub state: AppState,
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(Config::in_memory())
    }

    pub fn with_page_size(page_size: i64) -> Self {
        let mut config = Config::in_memory();
        config.pagination.page_size = page_size;
        Self::with_config(config)
    }

    fn with_config(config: Config) -> Self {
        let state = AppState::in_memory(config);
        let app = build_router(state.clone());
        Self { state, app }
    }

    /// Stores an account directly, bypassing registration
    pub async fn create_account(&self, username: &str, password: &str, is_seller: bool) -> Account {
        self.insert_account(username, password, is_seller, false).await
    }

    pub async fn create_admin(&self, username: &str, password: &str) -> Account {
        self.insert_account(username, password, false, true).await
    }

    async fn insert_account(
        &self,
        username: &str,
        password: &str,
        is_seller: bool,
        is_superuser: bool,
    ) -> Account {
        self.state
            .accounts
            .create(Account::new(NewAccount {
                username: username.to_string(),
                password_hash: hash_password(password).unwrap(),
                first_name: "first".to_string(),
                last_name: "last".to_string(),
                is_seller,
                is_active: true,
                is_superuser,
            }))
            .await
            .unwrap()
    }

    /// Logs in over HTTP and returns the token key
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/login/",
                None,
                json!({"username": username, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        body["token"].as_str().unwrap().to_string()
    }

    /// Creates an account and returns it with a login token
    pub async fn account_with_token(&self, username: &str, is_seller: bool) -> (Account, String) {
        let account = self.create_account(username, "abcd", is_seller).await;
        let token = self.login(username, "abcd").await;
        (account, token)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    /// Sends a JSON request, returns status and parsed body (`null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send(request).await
    }

    /// Sends a prepared request
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }
}

/// Sorted top-level keys of a JSON object
pub fn keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    keys
}
