//! Database layer - connection pool, migrations and repositories
//!
//! Every entity gets its own store trait (see [`repos`]) with a Postgres
//! implementation. Writes to different entities are separate statements;
//! nothing here opens a transaction spanning two tables.

pub mod migrations;
pub mod pool;
pub mod repos;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use std::sync::Arc;

pub use sqlx::PgPool;

pub use pool::{create_pool, create_pool_with_options, probe};
pub use repos::*;

/// The set of stores the domain cores run against
#[derive(Clone)]
pub struct Stores {
    pub collect_requests: Arc<dyn CollectRequestStore>,
    pub wastes: Arc<dyn WasteStore>,
    pub parameters: Arc<dyn ParameterStore>,
}

impl Stores {
    /// Postgres-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            collect_requests: Arc::new(PgCollectRequestRepo::new(pool.clone())),
            wastes: Arc::new(PgWasteRepo::new(pool.clone())),
            parameters: Arc::new(PgParameterRepo::new(pool)),
        }
    }
}
