//! Tablegate Storage Library
//!
//! This crate provides the storage abstraction behind the file relay: the
//! `Storage` trait, local filesystem and S3 implementations, and the
//! `FileRepository` that keeps a payload and its sidecar metadata together.
//!
//! # Storage key format
//!
//! Relay keys are `{timestamp_ms}-{sanitized filename}`. Inside a backend the
//! payload lives at `files/{key}` and its metadata at `meta/{key}.json`, so a
//! payload can never shadow another upload's sidecar. Key generation and
//! sanitization are centralized in the `keys` module so upload and serve always
//! agree.

pub mod factory;
pub mod files;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use files::FileRepository;
pub use keys::{generate_key, sanitize_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use tablegate_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
