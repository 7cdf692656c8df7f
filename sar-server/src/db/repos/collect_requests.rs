//! Collect request repository
//!
//! - store: INSERT with a generated id and the initial status
//! - modify_status: single UPDATE ... RETURNING, absent rows map to NotFound

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sar_core::domains::INITIAL_COLLECT_REQUEST_STATUS;
use sar_core::DatetimeFormatter;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{CollectRequestStore, DbError};

const COLUMNS: &str =
    "id, collect_date, process_status, production_center_id, created_at, updated_at";

/// Collect request record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CollectRequest {
    pub id: Uuid,
    pub collect_date: NaiveDate,
    pub process_status: i32,
    pub production_center_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postgres collect request repository
#[derive(Clone)]
pub struct PgCollectRequestRepo {
    pool: PgPool,
}

impl PgCollectRequestRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectRequestStore for PgCollectRequestRepo {
    async fn search_by_id(&self, id: Uuid) -> Result<Option<CollectRequest>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM collect_requests WHERE id = $1");
        let row = sqlx::query_as::<_, CollectRequest>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn store(
        &self,
        collect_date: NaiveDate,
        production_center_id: i32,
    ) -> Result<CollectRequest, DbError> {
        let now = DatetimeFormatter::now();
        let query = format!(
            r#"
            INSERT INTO collect_requests
                (id, collect_date, process_status, production_center_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, CollectRequest>(&query)
            .bind(Uuid::new_v4())
            .bind(collect_date)
            .bind(INITIAL_COLLECT_REQUEST_STATUS)
            .bind(production_center_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_state(&self, process_status: i32) -> Result<Vec<CollectRequest>, DbError> {
        let query = format!(
            "SELECT {COLUMNS} FROM collect_requests WHERE process_status = $1 ORDER BY created_at"
        );
        let rows = sqlx::query_as::<_, CollectRequest>(&query)
            .bind(process_status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn modify_status(
        &self,
        id: Uuid,
        process_status: i32,
    ) -> Result<CollectRequest, DbError> {
        let query = format!(
            r#"
            UPDATE collect_requests
            SET process_status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, CollectRequest>(&query)
            .bind(id)
            .bind(process_status)
            .bind(DatetimeFormatter::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("collect request", id))
    }
}
