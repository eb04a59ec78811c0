//! Authentication API Tests
//!
//! Rejections happen before any database access.

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use serde_json::{json, Value};
use test_case::test_case;

use crate::common::TestApp;

fn reason_of(body: &Value) -> &str {
    body["reason"].as_str().unwrap_or_default()
}

#[test_case("/api/applicants/" ; "applicants")]
#[test_case("/api/jobs/" ; "jobs")]
#[test_case("/api/applications/" ; "applications")]
#[test_case("/api/customers/" ; "customers")]
#[test_case("/api/products/" ; "products")]
#[test_case("/api/orders/" ; "orders")]
#[test_case("/api/analytics/sales-summary/" ; "sales summary")]
#[tokio::test]
async fn test_protected_routes_require_token(path: &str) {
    let app = TestApp::new();

    let response = app.server.get(path).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(reason_of(&response.json()), "token_missing");
}

#[tokio::test]
async fn test_non_bearer_header_is_malformed() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/jobs/")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Token abc"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(reason_of(&response.json()), "token_malformed");
}

#[tokio::test]
async fn test_expired_token_is_distinguished() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/jobs/")
        .authorization_bearer(app.expired_token())
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(reason_of(&response.json()), "token_expired");
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/jobs/")
        .authorization_bearer("not.a.jwt")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(reason_of(&response.json()), "token_invalid");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_invalid() {
    let app = TestApp::new();
    let mut jwt = app.settings.jwt.clone();
    jwt.secret = "a-completely-different-secret-of-32-chars".into();
    let (token, _) =
        recruit_sales_api::application::services::issue_access_token(1, &jwt).unwrap();

    let response = app.server.get("/api/jobs/").authorization_bearer(token).await;

    assert_eq!(reason_of(&response.json()), "token_invalid");
}

#[tokio::test]
async fn test_token_request_requires_fields() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/token/")
        .json(&json!({"username": "", "password": ""}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["password", "username"]);
}

#[tokio::test]
async fn test_refresh_requires_body() {
    let app = TestApp::new();

    let response = app.server.post("/api/token/refresh/").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
