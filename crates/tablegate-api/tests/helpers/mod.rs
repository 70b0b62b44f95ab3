//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tablegate-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::Arc;
use tablegate_api::constants;
use tablegate_api::setup::routes;
use tablegate_api::state::AppState;
use tablegate_core::Config;
use tablegate_storage::LocalStorage;
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "keyTestSecret";
pub const TEST_BASE_ID: &str = "appTestBase";
pub const TEST_SITE_URL: &str = "https://relay.example.test";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server plus the temp dir backing local storage.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Environment for an app whose proxy points at `upstream_url`.
pub fn upstream_env(upstream_url: &str) -> HashMap<&'static str, String> {
    HashMap::from([
        ("UPSTREAM_API_KEY", TEST_API_KEY.to_string()),
        ("UPSTREAM_BASE_ID", TEST_BASE_ID.to_string()),
        ("UPSTREAM_API_URL", upstream_url.to_string()),
        ("SITE_URL", TEST_SITE_URL.to_string()),
    ])
}

/// Setup a test app with local storage in a fresh temp dir.
pub async fn setup_test_app(vars: HashMap<&'static str, String>) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut vars = vars;
    vars.insert(
        "LOCAL_STORAGE_PATH",
        temp_dir.path().to_string_lossy().into_owned(),
    );

    let config = Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test config");
    config.validate().expect("Test config failed validation");

    let storage = LocalStorage::new(config.storage.local_storage_path.clone())
        .await
        .expect("Failed to create local storage");

    let state = AppState::new(config.clone(), Arc::new(storage)).expect("Failed to build state");
    let router = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}

/// Test app with a site URL and no upstream credentials.
pub async fn setup_relay_app() -> TestApp {
    setup_test_app(HashMap::from([("SITE_URL", TEST_SITE_URL.to_string())])).await
}
