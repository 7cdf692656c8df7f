//! sar-server: REST service for collect requests, wastes and parameters
//!
//! Layers, top to bottom:
//! - [`http`]: axum router, middleware and error mapping
//! - [`cores`]: domain workflows (code validation, store calls, response mapping)
//! - [`db`]: store traits with Postgres and in-memory implementations

pub mod cores;
pub mod db;
pub mod http;

pub use cores::{CoreError, CoreResult};
pub use db::{create_pool, probe, DbError, Stores};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
