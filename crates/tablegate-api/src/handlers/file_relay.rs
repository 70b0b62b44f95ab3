//! File relay: accepts base64 uploads, stores them under a generated key and
//! serves them back by key.
//!
//! One handler answers every method on the relay route. The request is first
//! resolved into a [`RelayOperation`] and then dispatched.

use crate::error::HttpAppError;
use crate::state::RelayState;
use axum::{
    extract::{rejection::BytesRejection, OriginalUri, Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};
use bytes::Bytes;
use serde::Deserialize;
use tablegate_core::{
    AppError, FileMetadata, ServeEncoding, StoredFile, UploadRequest, UploadResponse,
};
use tablegate_storage::{generate_key, sanitize_key};

/// Standard alphabet, padding optional, stray trailing bits tolerated.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const NOT_FOUND_MESSAGE: &str =
    "File not found: the temporary file may have expired. Please try uploading again.";

const CONTENT_TRANSFER_ENCODING: &str = "content-transfer-encoding";

#[derive(Debug, Default, Deserialize)]
pub struct RelayQuery {
    pub key: Option<String>,
}

/// What a relay request asks for.
#[derive(Debug)]
pub enum RelayOperation {
    Preflight,
    Upload(UploadRequest),
    Serve { key: String },
}

impl RelayOperation {
    /// Map method, query and body to an operation.
    ///
    /// Field-level validation (missing filename, missing key) happens when the
    /// operation runs so those errors carry their own messages.
    pub fn resolve(method: &Method, query: RelayQuery, body: &[u8]) -> Result<Self, AppError> {
        match *method {
            Method::OPTIONS => Ok(Self::Preflight),
            Method::GET => Ok(Self::Serve {
                key: query.key.unwrap_or_default(),
            }),
            Method::POST => {
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self::Upload(UploadRequest::default()));
                }
                let request = serde_json::from_slice::<UploadRequest>(body).map_err(|e| {
                    AppError::InvalidInput(format!("Invalid upload body: {}", e))
                })?;
                Ok(Self::Upload(request))
            }
            _ => Err(AppError::MethodNotAllowed("Method not allowed".to_string())),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::Upload(_) => "upload",
            Self::Serve { .. } => "serve",
        }
    }
}

/// Relay entry point for every method.
#[tracing::instrument(skip(relay, method, uri, query, body), fields(operation = "file_relay", method = %method))]
pub async fn file_relay(
    State(relay): State<RelayState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<RelayQuery>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpAppError> {
    let body = body?;

    let operation = RelayOperation::resolve(&method, query, &body)?;
    tracing::debug!(relay_operation = operation.name(), "Resolved relay operation");

    match operation {
        RelayOperation::Preflight => Ok(StatusCode::OK.into_response()),
        RelayOperation::Upload(request) => upload(&relay, uri.path(), request).await,
        RelayOperation::Serve { key } => serve(&relay, &key).await,
    }
}

async fn upload(
    relay: &RelayState,
    route_path: &str,
    request: UploadRequest,
) -> Result<Response, HttpAppError> {
    let (filename, content) = match (request.filename, request.content) {
        (Some(filename), Some(content)) if !filename.is_empty() && !content.is_empty() => {
            (filename, content)
        }
        _ => {
            return Err(
                AppError::InvalidInput("Missing filename or content".to_string()).into(),
            )
        }
    };

    let key = generate_key(chrono::Utc::now().timestamp_millis(), &filename);
    let data = decode_content(&content)?;
    let size_bytes = data.len();

    let metadata = FileMetadata::new(request.content_type.as_deref(), filename.clone());
    relay.files.save(&key, data, &metadata).await?;

    let url = format!(
        "{}{}?key={}",
        relay.site_url,
        route_path,
        urlencoding::encode(&key)
    );

    tracing::info!(
        key = %key,
        size_bytes,
        content_type = %metadata.content_type,
        "File stored"
    );

    Ok(Json(UploadResponse { url, key, filename }).into_response())
}

async fn serve(relay: &RelayState, key: &str) -> Result<Response, HttpAppError> {
    if key.is_empty() {
        return Err(AppError::InvalidInput("Missing key parameter".to_string()).into());
    }

    let key = sanitize_key(key);
    let file = relay
        .files
        .load(&key)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    tracing::info!(key = %key, size_bytes = file.data.len(), "Serving file");

    Ok(serve_response(file, relay.serve_encoding))
}

fn serve_response(file: StoredFile, encoding: ServeEncoding) -> Response {
    let mut headers = HeaderMap::new();

    let content_type = HeaderValue::from_str(&file.metadata.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(tablegate_core::models::DEFAULT_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, content_type);

    let disposition = content_disposition(&file.metadata.filename)
        .or_else(|| content_disposition(&file.key))
        .unwrap_or_else(|| HeaderValue::from_static("inline"));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    match encoding {
        ServeEncoding::Base64 => {
            headers.insert(CONTENT_TRANSFER_ENCODING, HeaderValue::from_static("base64"));
            let body = base64::engine::general_purpose::STANDARD.encode(&file.data);
            (StatusCode::OK, headers, body).into_response()
        }
        ServeEncoding::Raw => (StatusCode::OK, headers, file.data).into_response(),
    }
}

/// `inline; filename="..."` with characters that would break the quoted string replaced.
fn content_disposition(filename: &str) -> Option<HeaderValue> {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c == '"' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    HeaderValue::from_str(&format!("inline; filename=\"{}\"", safe)).ok()
}

/// Decode upload content. Whitespace is ignored, as is a `data:<type>;base64,` prefix.
fn decode_content(content: &str) -> Result<Vec<u8>, AppError> {
    let payload = match content.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => content,
    };

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| AppError::Internal(format!("Failed to decode file content: {}", e)))
}
