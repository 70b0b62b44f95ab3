pub mod cors;
pub mod request_id;

pub use cors::{cors_headers_middleware, CorsHeaders};
pub use request_id::request_id_middleware;
