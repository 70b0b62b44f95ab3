//! File repository: relay payloads plus their sidecar metadata.

use crate::keys::{metadata_key, object_key};
use crate::traits::{Storage, StorageError, StorageResult};
use std::sync::Arc;
use tablegate_core::{FileMetadata, StoredFile};

#[derive(Clone)]
pub struct FileRepository {
    storage: Arc<dyn Storage>,
}

impl FileRepository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Store a payload and its metadata under `key`.
    ///
    /// The payload is written first. If the sidecar write fails the payload is
    /// removed again, so a key is either fully stored or absent.
    pub async fn save(
        &self,
        key: &str,
        data: Vec<u8>,
        metadata: &FileMetadata,
    ) -> StorageResult<()> {
        let meta_json = serde_json::to_vec(metadata)
            .map_err(|e| StorageError::BackendError(format!("Failed to encode metadata: {}", e)))?;

        let payload_key = object_key(key);
        self.storage
            .upload_with_key(&payload_key, data, &metadata.content_type)
            .await?;

        if let Err(e) = self
            .storage
            .upload_with_key(&metadata_key(key), meta_json, "application/json")
            .await
        {
            if let Err(cleanup_err) = self.storage.delete(&payload_key).await {
                tracing::warn!(
                    key = %key,
                    error = %cleanup_err,
                    "Failed to remove payload after metadata write failure"
                );
            }
            return Err(e);
        }

        Ok(())
    }

    /// Load the payload and metadata for `key`.
    ///
    /// Returns `None` when no payload exists, including for keys no upload
    /// could have produced. A missing or unreadable sidecar falls back to
    /// `application/octet-stream` with the key as filename.
    pub async fn load(&self, key: &str) -> StorageResult<Option<StoredFile>> {
        let data = match self.storage.download(&object_key(key)).await {
            Ok(data) => data,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(StorageError::InvalidKey(e)) => {
                tracing::debug!(key = %key, error = %e, "Unstorable key requested");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let metadata = match self.storage.download(&metadata_key(key)).await {
            Ok(raw) => serde_json::from_slice::<FileMetadata>(&raw).unwrap_or_else(|e| {
                tracing::debug!(key = %key, error = %e, "Unparsable file metadata, using defaults");
                FileMetadata::fallback(key)
            }),
            Err(StorageError::NotFound(_)) => FileMetadata::fallback(key),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read file metadata, using defaults");
                FileMetadata::fallback(key)
            }
        };

        Ok(Some(StoredFile {
            key: key.to_string(),
            data,
            metadata,
        }))
    }
}
