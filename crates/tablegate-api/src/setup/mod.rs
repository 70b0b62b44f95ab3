//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tablegate_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment());
    crate::error::set_hide_error_details(config.is_production());

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        serve_encoding = ?config.serve_encoding(),
        "Configuration loaded and validated successfully"
    );

    if !config.upstream.is_configured() {
        tracing::warn!(
            "Upstream API key or base id not set; proxy requests will fail until configured"
        );
    }
    if config.site_url().is_empty() {
        tracing::warn!("SITE_URL not set; upload responses will carry relative URLs");
    }

    let storage = storage::setup_storage(&config).await?;
    let state = AppState::new(config.clone(), storage)?;
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
