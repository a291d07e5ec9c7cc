/// Login, token authentication and request handling tests
///
/// Run with: cargo test -p bazaar-api --test auth_test

mod common;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use common::{keys, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_login_returns_token() {
    let ctx = TestContext::new();
    ctx.create_account("ale", "abcd", false).await;

    let (status, body) = ctx
        .post("/api/login/", None, json!({"username": "ale", "password": "abcd"}))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["token"]);
    assert!(body["token"].as_str().unwrap().starts_with("bzr_"));
}

#[tokio::test]
async fn test_each_login_issues_a_working_token() {
    let ctx = TestContext::new();
    ctx.create_account("ale", "abcd", true).await;

    let first = ctx.login("ale", "abcd").await;
    let second = ctx.login("ale", "abcd").await;
    assert_ne!(first, second);

    for token in [&first, &second] {
        let (status, _) = ctx
            .post(
                "/api/products/",
                Some(token),
                json!({"description": "Mouse", "price": "9.90", "quantity": 1}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_login_wrong_password() {
    let ctx = TestContext::new();
    ctx.create_account("ale", "abcd", false).await;

    let (status, body) = ctx
        .post("/api/login/", None, json!({"username": "ale", "password": "banana"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"non_field_errors": ["Unable to log in with provided credentials."]})
    );
}

#[tokio::test]
async fn test_login_unknown_user() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .post("/api/login/", None, json!({"username": "ghost", "password": "abcd"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(keys(&body), vec!["non_field_errors"]);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let ctx = TestContext::new();

    let (status, body) = ctx.post("/api/login/", None, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(keys(&body), vec!["password", "username"]);
}

#[tokio::test]
async fn test_invalid_token_rejected_even_on_open_endpoints() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/api/products/", Some("bzr_doesnotexist")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"detail": "Invalid token."}));
}

#[tokio::test]
async fn test_unauthorized_carries_authenticate_header() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/products/")
        .header(header::AUTHORIZATION, "Token")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Token"
    );
}

#[tokio::test]
async fn test_malformed_token_headers() {
    let ctx = TestContext::new();

    for (value, message) in [
        ("Token", "Invalid token header. No credentials provided."),
        (
            "Token bzr_a bzr_b",
            "Invalid token header. Token string should not contain spaces.",
        ),
    ] {
        let request = Request::builder()
            .uri("/api/products/")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let (status, body) = ctx.send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], message);
    }
}

#[tokio::test]
async fn test_non_ascii_token_header() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/api/products/")
        .header(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Token bzr_\xe9\xe9").unwrap(),
        )
        .body(Body::empty())
        .unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({"detail": "Invalid token header. Token string should not contain invalid characters."})
    );
}

#[tokio::test]
async fn test_other_schemes_are_anonymous() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/api/products/")
        .header(header::AUTHORIZATION, "Bearer something")
        .body(Body::empty())
        .unwrap();
    let (status, _) = ctx.send(request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/accounts/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("JSON parse error"));
}

#[tokio::test]
async fn test_non_object_body() {
    let ctx = TestContext::new();

    let (status, body) = ctx.post("/api/accounts/", None, json!(["ale"])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"non_field_errors": ["Invalid data. Expected a dictionary, but got list."]})
    );
}

#[tokio::test]
async fn test_empty_body_registration() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/accounts/")
        .body(Body::empty())
        .unwrap();
    let (status, body) = ctx.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        keys(&body),
        vec!["first_name", "last_name", "password", "username"]
    );
}

#[tokio::test]
async fn test_unsupported_method() {
    let ctx = TestContext::new();

    let (status, _) = ctx
        .request(Method::DELETE, "/api/products/", None, None)
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let (status, body) = ctx.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "memory");
    assert_eq!(body["version"], bazaar_shared::VERSION);
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .uri("/api/accounts/")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}
