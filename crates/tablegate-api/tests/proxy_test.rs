//! Upstream proxy integration tests against a mocked upstream API.
//!
//! Run with: `cargo test -p tablegate-api --test proxy_test`

mod helpers;

use axum::http::{Method, StatusCode};
use helpers::{api_path, setup_relay_app, setup_test_app, upstream_env, TEST_API_KEY, TEST_BASE_ID};
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn table_path(table: &str) -> String {
    format!("/{}/{}", TEST_BASE_ID, table)
}

#[tokio::test]
async fn test_list_records_is_relayed() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(table_path("Equipment")))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [{ "id": "rec1", "fields": { "Name": "Drill" } }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = setup_test_app(upstream_env(&upstream.uri())).await;
    let response = app
        .client()
        .get(&api_path("/proxy"))
        .add_query_param("path", "Equipment")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: serde_json::Value = response.json();
    assert_eq!(body["records"][0]["fields"]["Name"], "Drill");
}

#[tokio::test]
async fn test_offset_is_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(table_path("Equipment")))
        .and(query_param("offset", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": [] })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = setup_test_app(upstream_env(&upstream.uri())).await;
    let response = app
        .client()
        .get(&api_path("/proxy"))
        .add_query_param("path", "Equipment")
        .add_query_param("offset", "abc")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_forwards_body_and_status() {
    let upstream = MockServer::start().await;
    let record = json!({ "fields": { "Name": "Saw" } });
    Mock::given(method("POST"))
        .and(path(table_path("Equipment")))
        .and(header("content-type", "application/json"))
        .and(body_json(&record))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "rec2", "fields": { "Name": "Saw" } })),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = setup_test_app(upstream_env(&upstream.uri())).await;
    let response = app
        .client()
        .post(&api_path("/proxy"))
        .add_query_param("path", "Equipment")
        .json(&record)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], "rec2");
}

#[tokio::test]
async fn test_upstream_error_status_is_relayed() {
    let upstream = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(table_path("Equipment/recMissing")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "NOT_FOUND" })))
        .mount(&upstream)
        .await;

    let app = setup_test_app(upstream_env(&upstream.uri())).await;
    let response = app
        .client()
        .method(Method::DELETE, &api_path("/proxy"))
        .add_query_param("path", "Equipment/recMissing")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_non_json_upstream_body_is_server_error() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&upstream)
        .await;

    let app = setup_test_app(upstream_env(&upstream.uri())).await;
    let response = app
        .client()
        .get(&api_path("/proxy"))
        .add_query_param("path", "Equipment")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_unconfigured_proxy_never_calls_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let mut env = upstream_env(&upstream.uri());
    env.remove("UPSTREAM_API_KEY");
    let app = setup_test_app(env).await;

    let response = app
        .client()
        .get(&api_path("/proxy"))
        .add_query_param("path", "Equipment")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SERVER_MISCONFIGURED");
}

#[tokio::test]
async fn test_missing_path_is_bad_request() {
    let upstream = MockServer::start().await;
    let app = setup_test_app(upstream_env(&upstream.uri())).await;

    let response = app.client().get(&api_path("/proxy")).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing path parameter");
}

#[tokio::test]
async fn test_preflight_and_cors_headers() {
    let app = setup_relay_app().await;
    let client = app.client();

    let responses = [
        client.method(Method::OPTIONS, &api_path("/proxy")).await,
        client
            .get("/.netlify/functions/airtable")
            .add_query_param("path", "Equipment")
            .await,
    ];

    assert_eq!(responses[0].status_code(), StatusCode::OK);
    // Unconfigured, but the error still carries CORS headers.
    assert_eq!(responses[1].status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    for response in responses {
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "GET, POST, PATCH, DELETE, OPTIONS"
        );
        assert_eq!(
            response.headers()["access-control-allow-headers"],
            "Content-Type"
        );
    }
}
