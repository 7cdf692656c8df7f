//! Domain cores - one per use-case area
//!
//! Cores validate reference codes against the parameter table, call the
//! stores in order and map records to response DTOs. Domain id sets are
//! fetched on every call; nothing is cached.

pub mod collect_request;
pub mod parameter;
pub mod waste;

use thiserror::Error;

use crate::db::DbError;
use sar_core::ValidationError;

pub use collect_request::CollectRequestCore;
pub use parameter::ParameterCore;
pub use waste::WasteCore;

/// Errors surfaced by the domain cores
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected (invalid-input)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced record does not exist (missing-resource)
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Storage failure, not handled by the workflows
    #[error(transparent)]
    Database(DbError),
}

impl From<DbError> for CoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Database(other),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
