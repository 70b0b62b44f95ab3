//! Tablegate Core Library
//!
//! This crate provides the configuration, error types, and shared models used by
//! the storage layer and the HTTP handlers.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ServeEncoding, StorageConfig, UpstreamConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileMetadata, StoredFile, UploadRequest, UploadResponse};
pub use storage_types::StorageBackend;
