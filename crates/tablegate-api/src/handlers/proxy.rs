//! Upstream API proxy: forwards a client request to the tabular-data API with
//! the secret credential attached server-side, then relays status and body.

use crate::error::HttpAppError;
use crate::state::ProxyState;
use axum::{
    extract::{rejection::BytesRejection, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tablegate_core::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct ProxyQuery {
    pub path: Option<String>,
    pub offset: Option<String>,
}

/// One inbound call rewritten for the upstream API.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub path: String,
    pub offset: Option<String>,
    pub method: Method,
    /// Only present for write methods that carry a body.
    pub body: Option<Bytes>,
}

impl ProxyRequest {
    pub fn from_parts(method: Method, query: ProxyQuery, body: Bytes) -> Result<Self, AppError> {
        let path = query
            .path
            .map(|p| p.trim().trim_start_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Missing path parameter".to_string()))?;

        let offset = query.offset.filter(|o| !o.is_empty());

        let forwards_body = method == Method::POST || method == Method::PATCH;
        let body = (forwards_body && !body.is_empty()).then_some(body);

        Ok(Self {
            path,
            offset,
            method,
            body,
        })
    }

    /// `{api_url}/{base_id}/{path}`, plus `?offset=` when paginating.
    pub fn upstream_url(&self, api_url: &str, base_id: &str) -> String {
        let mut url = format!("{}/{}/{}", api_url.trim_end_matches('/'), base_id, self.path);
        if let Some(ref offset) = self.offset {
            url.push_str("?offset=");
            url.push_str(&urlencoding::encode(offset));
        }
        url
    }
}

/// Forward a request to the upstream API.
#[tracing::instrument(skip(proxy, method, query, body), fields(operation = "proxy_request", method = %method))]
pub async fn proxy_request(
    State(proxy): State<ProxyState>,
    method: Method,
    Query(query): Query<ProxyQuery>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpAppError> {
    let body = body?;

    // Browser preflight is answered locally; the CORS headers come from middleware.
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    // Checked before the request is parsed so a misconfigured deployment never calls out.
    let (api_key, base_id) = proxy.upstream.credentials().ok_or_else(|| {
        AppError::Misconfigured(
            "Server misconfigured: missing upstream API key or base id".to_string(),
        )
    })?;

    let request = ProxyRequest::from_parts(method, query, body)?;
    let url = request.upstream_url(&proxy.upstream.api_url, base_id);

    tracing::debug!(path = %request.path, offset = ?request.offset, "Forwarding to upstream");

    let mut builder = proxy
        .client
        .request(request.method.clone(), &url)
        .bearer_auth(api_key)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let upstream = builder.send().await.map_err(|e| {
        tracing::error!(error = %e, path = %request.path, "Upstream request failed");
        AppError::Upstream(e.to_string())
    })?;

    let status = upstream.status();
    let raw = upstream
        .bytes()
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to read upstream response: {}", e)))?;

    tracing::info!(status = status.as_u16(), size_bytes = raw.len(), "Upstream responded");

    if raw.is_empty() {
        return Ok(status.into_response());
    }

    let data: serde_json::Value = serde_json::from_slice(&raw)
        .map_err(|e| AppError::Upstream(format!("Invalid JSON from upstream: {}", e)))?;

    Ok((status, Json(data)).into_response())
}
