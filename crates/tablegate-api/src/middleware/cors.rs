use axum::http::{header, HeaderValue};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Fixed CORS headers for one route group.
#[derive(Clone, Debug)]
pub struct CorsHeaders {
    pub allowed_methods: &'static str,
}

impl CorsHeaders {
    pub fn new(allowed_methods: &'static str) -> Self {
        Self { allowed_methods }
    }
}

/// Adds the CORS headers to every response of the route group, errors included.
pub async fn cors_headers_middleware(
    State(config): State<Arc<CorsHeaders>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(config.allowed_methods),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    response
}
