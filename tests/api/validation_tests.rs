//! Request Validation Tests
//!
//! Each request here is rejected before the handler reaches the database.

use axum::http::StatusCode;
use serde_json::{json, Value};
use test_case::test_case;

use crate::common::TestApp;

fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_order_needs_items() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/orders/")
        .authorization_bearer(app.token())
        .json(&json!({"customer": 1, "items": []}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response.json()), vec!["items"]);
}

#[tokio::test]
async fn test_order_quantity_errors_are_indexed() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/orders/")
        .authorization_bearer(app.token())
        .json(&json!({
            "customer": 1,
            "items": [{"product": 1, "quantity": 2}, {"product": 2, "quantity": 0}]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response.json()), vec!["items[1].quantity"]);
}

#[test_case(json!("0.00"), "Ensure this value is greater than 0." ; "zero")]
#[test_case(json!("1.999"), "Ensure that there are no more than 2 decimal places." ; "three places")]
#[tokio::test]
async fn test_product_price_rules(price: Value, message: &str) {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/products/")
        .authorization_bearer(app.token())
        .json(&json!({"name": "Widget", "price": price}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "price");
    assert_eq!(body["errors"][0]["message"], message);
}

#[tokio::test]
async fn test_applicant_email_and_phone_are_checked() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/applicants/")
        .authorization_bearer(app.token())
        .json(&json!({"name": "Ann", "email": "not-an-email", "phone": "call me"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response.json()), vec!["email", "phone"]);
}

#[tokio::test]
async fn test_unknown_status_is_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .patch("/api/applications/1/status/")
        .authorization_bearer(app.token())
        .json(&json!({"status": "hired"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["errors"][0]["field"], "status");
    assert_eq!(body["errors"][0]["message"], "\"hired\" is not a valid choice.");
}

#[tokio::test]
async fn test_unknown_status_filter_is_rejected() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/applications/?status=hired")
        .authorization_bearer(app.token())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_case("/api/analytics/top-customers/?from=yesterday", "from" ; "bad from")]
#[test_case("/api/analytics/top-products/?to=2024-02-30", "to" ; "bad to")]
#[test_case("/api/orders/?from=2024-03-01&to=2024-02-01", "to" ; "reversed")]
#[tokio::test]
async fn test_bad_date_bounds(path: &str, field: &str) {
    let app = TestApp::new();

    let response = app.server.get(path).authorization_bearer(app.token()).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response.json()), vec![field.to_string()]);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .server
        .get("/api/customers/abc/")
        .authorization_bearer(app.token())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/jobs/")
        .authorization_bearer(app.token())
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response.json()), vec!["non_field_errors"]);
}

#[tokio::test]
async fn test_apply_names_missing_field() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/apply/")
        .authorization_bearer(app.token())
        .json(&json!({"applicant_id": 1}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(error_fields(&body), vec!["job_id"]);
    assert_eq!(body["errors"][0]["message"], "This field is required.");
}

#[tokio::test]
async fn test_order_mistyped_quantity_names_its_path() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/api/orders/")
        .authorization_bearer(app.token())
        .json(&json!({"customer": 1, "items": [{"product": 1, "quantity": "x"}]}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response.json()), vec!["items[0].quantity"]);
}
