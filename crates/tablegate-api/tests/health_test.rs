//! Health endpoint integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::{setup_relay_app, setup_test_app, upstream_env};

#[tokio::test]
async fn test_liveness() {
    let app = setup_relay_app().await;

    let response = app.client().get("/live").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_with_local_storage() {
    let app = setup_relay_app().await;

    let response = app.client().get("/ready").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["storage"], "ready");
}

#[tokio::test]
async fn test_health_reports_upstream_configuration() {
    let app = setup_relay_app().await;
    let body: serde_json::Value = app.client().get("/health").await.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["upstream"], "not_configured");

    let app = setup_test_app(upstream_env("http://127.0.0.1:9")).await;
    let body: serde_json::Value = app.client().get("/health").await.json();
    assert_eq!(body["upstream"], "configured");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = setup_relay_app().await;

    let response = app
        .client()
        .get("/live")
        .add_header("X-Request-ID", "req-123")
        .await;
    assert_eq!(response.headers()["x-request-id"], "req-123");

    let response = app.client().get("/live").await;
    assert!(response.headers().contains_key("x-request-id"));
}
