//! Repository traits and their Postgres implementations
//!
//! One store per table. Each operation is a single parameterized statement:
//! no joins, no transactions across entities. Identifiers and timestamps are
//! generated by the store on insert.

pub mod collect_requests;
pub mod parameters;
pub mod wastes;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

pub use collect_requests::{CollectRequest, PgCollectRequestRepo};
pub use parameters::{Parameter, PgParameterRepo};
pub use wastes::{NewWaste, PgWasteRepo, Waste, WasteClassification};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// Persistence contract for collect requests
#[async_trait]
pub trait CollectRequestStore: Send + Sync {
    async fn search_by_id(&self, id: Uuid) -> Result<Option<CollectRequest>, DbError>;

    /// Insert a request with the initial status and equal create/update
    /// timestamps.
    async fn store(
        &self,
        collect_date: NaiveDate,
        production_center_id: i32,
    ) -> Result<CollectRequest, DbError>;

    async fn find_by_state(&self, process_status: i32) -> Result<Vec<CollectRequest>, DbError>;

    /// Overwrite status and update timestamp. `NotFound` when absent, in
    /// which case nothing is written.
    async fn modify_status(&self, id: Uuid, process_status: i32)
        -> Result<CollectRequest, DbError>;
}

/// Persistence contract for wastes
#[async_trait]
pub trait WasteStore: Send + Sync {
    async fn search_by_id(&self, id: Uuid) -> Result<Option<Waste>, DbError>;

    async fn store(&self, waste: NewWaste) -> Result<Waste, DbError>;

    async fn find_by_state(&self, process_status: i32) -> Result<Vec<Waste>, DbError>;

    async fn modify_status(&self, id: Uuid, process_status: i32) -> Result<Waste, DbError>;

    async fn classify(
        &self,
        id: Uuid,
        classification: WasteClassification,
    ) -> Result<Waste, DbError>;
}

/// Read-only access to the parameter table
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn list_by_domain(&self, domain: &str) -> Result<Vec<Parameter>, DbError>;

    async fn ids_by_domain(&self, domain: &str) -> Result<BTreeSet<i32>, DbError> {
        let parameters = self.list_by_domain(domain).await?;
        Ok(parameters.into_iter().map(|p| p.id).collect())
    }
}
