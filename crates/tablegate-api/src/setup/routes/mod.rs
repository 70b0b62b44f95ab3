//! Route configuration and setup.
//!
//! Each handler group carries its own CORS header layer; health checks live in
//! [health](health).

mod health;

use crate::constants::{
    FILES_ALLOWED_METHODS, FILES_PATH, LEGACY_FILES_PATH, LEGACY_PROXY_PATH,
    PROXY_ALLOWED_METHODS, PROXY_PATH,
};
use crate::handlers::{file_relay::file_relay, proxy::proxy_request};
use crate::middleware::{cors_headers_middleware, request_id_middleware, CorsHeaders};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tablegate_core::Config;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let max_body_bytes = config.max_upload_size_bytes();
    tracing::info!(max_body_bytes, "Request body limit enabled");

    Router::new()
        .merge(proxy_routes())
        .merge(relay_routes())
        .merge(health_routes())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state)
}

fn proxy_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(PROXY_PATH, any(proxy_request))
        .route(LEGACY_PROXY_PATH, any(proxy_request))
        .layer(axum::middleware::from_fn_with_state(
            Arc::new(CorsHeaders::new(PROXY_ALLOWED_METHODS)),
            cors_headers_middleware,
        ))
}

fn relay_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(FILES_PATH, any(file_relay))
        .route(LEGACY_FILES_PATH, any(file_relay))
        .layer(axum::middleware::from_fn_with_state(
            Arc::new(CorsHeaders::new(FILES_ALLOWED_METHODS)),
            cors_headers_middleware,
        ))
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .route("/health", get(health::health_check))
}
