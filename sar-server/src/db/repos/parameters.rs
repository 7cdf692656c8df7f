//! Parameter repository (read-only)

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{DbError, ParameterStore};

/// Parameter record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Parameter {
    pub id: i32,
    pub domain: String,
    pub value: String,
}

/// Postgres parameter repository
#[derive(Clone)]
pub struct PgParameterRepo {
    pool: PgPool,
}

impl PgParameterRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParameterStore for PgParameterRepo {
    async fn list_by_domain(&self, domain: &str) -> Result<Vec<Parameter>, DbError> {
        let rows = sqlx::query_as::<_, Parameter>(
            "SELECT id, domain, value FROM parameters WHERE domain = $1 ORDER BY id",
        )
        .bind(domain)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ids_by_domain(&self, domain: &str) -> Result<BTreeSet<i32>, DbError> {
        let ids: Vec<i32> = sqlx::query_scalar("SELECT id FROM parameters WHERE domain = $1")
            .bind(domain)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }
}
