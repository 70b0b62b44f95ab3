//! Shared file relay models.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Sidecar metadata stored next to an uploaded payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub content_type: String,
    pub filename: String,
}

impl FileMetadata {
    pub fn new(content_type: Option<&str>, filename: impl Into<String>) -> Self {
        let content_type = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        Self {
            content_type: content_type.to_string(),
            filename: filename.into(),
        }
    }

    /// Metadata used when the sidecar is missing or unreadable.
    pub fn fallback(key: &str) -> Self {
        Self::new(None, key)
    }
}

/// A payload together with its metadata, as loaded from storage.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub key: String,
    pub data: Vec<u8>,
    pub metadata: FileMetadata,
}

/// Upload body. Fields are optional so missing ones are reported as a client
/// error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub filename: Option<String>,
    /// Base64-encoded file content
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_uses_camel_case_on_the_wire() {
        let meta = FileMetadata::new(Some("text/plain"), "a.txt");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "contentType": "text/plain", "filename": "a.txt" })
        );
    }

    #[test]
    fn blank_content_type_defaults_to_octet_stream() {
        assert_eq!(
            FileMetadata::new(Some("  "), "x").content_type,
            DEFAULT_CONTENT_TYPE
        );
        assert_eq!(FileMetadata::fallback("k").filename, "k");
    }

    #[test]
    fn upload_request_tolerates_missing_fields() {
        let req: UploadRequest = serde_json::from_str(r#"{"filename":"a.txt"}"#).unwrap();
        assert_eq!(req.filename.as_deref(), Some("a.txt"));
        assert!(req.content.is_none());

        let req: UploadRequest =
            serde_json::from_str(r#"{"filename":"a","content":"aGk=","contentType":"text/plain"}"#)
                .unwrap();
        assert_eq!(req.content_type.as_deref(), Some("text/plain"));
    }
}
