//! Route constants.

/// Versioned API prefix
pub const API_PREFIX: &str = "/api/v0";

/// Upstream API proxy route
pub const PROXY_PATH: &str = "/api/v0/proxy";

/// File relay route (upload, serve, preflight)
pub const FILES_PATH: &str = "/api/v0/files";

/// Function-style aliases kept so existing front-ends keep working unchanged.
pub const LEGACY_PROXY_PATH: &str = "/.netlify/functions/airtable";
pub const LEGACY_FILES_PATH: &str = "/.netlify/functions/file-upload";

/// Methods advertised to browsers for each route group.
pub const PROXY_ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";
pub const FILES_ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
