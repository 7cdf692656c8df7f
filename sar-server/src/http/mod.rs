//! HTTP layer
//!
//! Axum server with:
//! - Permissive CORS
//! - Request tracing with a per-request id (`x-request-id`)
//! - Optional bearer-token middleware
//! - Graceful shutdown
//! - JSON error responses

pub mod auth;
pub mod docs;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use auth::AuthSettings;
pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
