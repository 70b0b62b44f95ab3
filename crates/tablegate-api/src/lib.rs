//! Tablegate API Library
//!
//! This crate provides the HTTP handlers, middleware, and application setup for
//! the upstream API proxy and the file relay.

pub mod constants;
pub mod error;
mod handlers;
mod middleware;
pub mod setup;
pub mod state;
mod telemetry;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::file_relay::RelayOperation;
pub use handlers::proxy::ProxyRequest;
pub use state::AppState;
