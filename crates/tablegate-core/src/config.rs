//! Configuration module
//!
//! Configuration is read once at startup and handed to the handlers through
//! application state. Nothing below the binary entry point reads the process
//! environment, so tests build a `Config` from a plain lookup function.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_UPSTREAM_API_URL: &str = "https://api.airtable.com/v0";
const UPSTREAM_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 10;

/// How the relay encodes stored bytes when serving them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServeEncoding {
    /// Body is the base64 text of the payload.
    #[default]
    Base64,
    /// Body is the payload bytes as stored.
    Raw,
}

impl FromStr for ServeEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base64" => Ok(ServeEncoding::Base64),
            "raw" => Ok(ServeEncoding::Raw),
            _ => Err(anyhow::anyhow!("Invalid serve encoding: {}", s)),
        }
    }
}

/// Server-wide settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub environment: String,
    /// Public origin of this deployment, without a trailing slash. May be empty,
    /// in which case retrieval URLs are origin-relative.
    pub site_url: String,
    pub max_upload_size_bytes: usize,
}

/// Upstream tabular-data API settings for the proxy
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub api_key: Option<String>,
    pub base_id: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Both the secret and the base identifier are present.
    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }

    /// Returns `(api_key, base_id)` when both are set and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        let base = self.base_id.as_deref().filter(|b| !b.is_empty())?;
        Some((key, base))
    }
}

/// File relay storage settings
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_storage_path: PathBuf,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub serve_encoding: ServeEncoding,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub upstream: UpstreamConfig,
    pub storage: StorageConfig,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match var("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let site_url = var("SITE_URL")
            .or_else(|| var("URL"))
            .or_else(|| var("DEPLOY_PRIME_URL"))
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or_default();

        let max_upload_size_mb = match var("MAX_UPLOAD_SIZE_MB") {
            Some(mb) => mb
                .trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be a valid number"))?,
            None => MAX_UPLOAD_SIZE_MB,
        };

        let max_upload_size_bytes = max_upload_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large"))?;

        let timeout_secs = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS must be a valid number"))?,
            None => UPSTREAM_TIMEOUT_SECS,
        };

        let base = BaseConfig {
            server_port,
            environment,
            site_url,
            max_upload_size_bytes,
        };

        let upstream = UpstreamConfig {
            api_key: var("UPSTREAM_API_KEY").or_else(|| var("AIRTABLE_API_KEY")),
            base_id: var("UPSTREAM_BASE_ID").or_else(|| var("AIRTABLE_BASE_ID")),
            api_url: var("UPSTREAM_API_URL")
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_UPSTREAM_API_URL.to_string()),
            timeout_secs,
        };

        let backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::Local,
        };

        let serve_encoding = match var("SERVE_ENCODING") {
            Some(s) => s.parse()?,
            None => ServeEncoding::default(),
        };

        let storage = StorageConfig {
            backend,
            local_storage_path: var("LOCAL_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join("tablegate")),
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            serve_encoding,
        };

        Ok(Config {
            base,
            upstream,
            storage,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_UPLOAD_SIZE_MB must be greater than zero"
            ));
        }

        let site_url = &self.base.site_url;
        if !site_url.is_empty()
            && !(site_url.starts_with("http://") || site_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "SITE_URL must start with http:// or https://"
            ));
        }

        if self.storage.backend == StorageBackend::S3 {
            if self.storage.s3_bucket.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_BUCKET must be set when using S3 storage backend"
                ));
            }
            if self.storage.s3_region.is_none() {
                return Err(anyhow::anyhow!(
                    "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                ));
            }
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn site_url(&self) -> &str {
        &self.base.site_url
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.base.max_upload_size_bytes
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn serve_encoding(&self) -> ServeEncoding {
        self.storage.serve_encoding
    }
}
