//! Application state and sub-state extractors.
//!
//! Each handler extracts only the sub-state it needs via Axum's `FromRef`, so
//! the proxy never sees storage and the relay never sees the upstream secret.

use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Duration;
use tablegate_core::{Config, ServeEncoding, UpstreamConfig};
use tablegate_storage::{FileRepository, Storage};

/// Upstream API settings plus a shared HTTP client.
#[derive(Clone)]
pub struct ProxyState {
    pub upstream: UpstreamConfig,
    pub client: reqwest::Client,
}

/// File relay storage and URL settings.
#[derive(Clone)]
pub struct RelayState {
    pub files: FileRepository,
    /// Public origin used to build retrieval URLs (no trailing slash, may be empty).
    pub site_url: String,
    pub serve_encoding: ServeEncoding,
}

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub proxy: ProxyState,
    pub relay: RelayState,
}

impl AppState {
    /// Build state from configuration and an already-initialized storage backend.
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Result<Arc<Self>, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let proxy = ProxyState {
            upstream: config.upstream.clone(),
            client,
        };

        let relay = RelayState {
            files: FileRepository::new(storage),
            site_url: config.site_url().to_string(),
            serve_encoding: config.serve_encoding(),
        };

        Ok(Arc::new(AppState {
            config,
            proxy,
            relay,
        }))
    }
}

impl FromRef<Arc<AppState>> for ProxyState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.proxy.clone()
    }
}

impl FromRef<Arc<AppState>> for RelayState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.relay.clone()
    }
}
