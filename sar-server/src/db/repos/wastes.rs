//! Waste repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sar_core::DatetimeFormatter;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{DbError, WasteStore};

const COLUMNS: &str = "id, request_id, waste_type, packaging, process_status, weight_in_kg, \
                       volume_in_l, isotopes_number, state_waste, store_type, description, note, \
                       created_at, updated_at";

/// Waste record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Waste {
    pub id: Uuid,
    pub request_id: Uuid,
    pub waste_type: i32,
    pub packaging: i32,
    pub process_status: i32,
    pub weight_in_kg: Decimal,
    pub volume_in_l: Decimal,
    pub isotopes_number: Option<Decimal>,
    pub state_waste: Option<i32>,
    pub store_type: Option<i32>,
    pub description: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a waste is first stored with its request
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaste {
    pub request_id: Uuid,
    pub waste_type: i32,
    pub packaging: i32,
    pub process_status: i32,
    pub weight_in_kg: Decimal,
    pub volume_in_l: Decimal,
    pub description: String,
    pub note: Option<String>,
}

/// Classification data set on an existing waste
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WasteClassification {
    pub isotopes_number: Decimal,
    pub state_waste: i32,
    pub store_type: i32,
}

/// Postgres waste repository
#[derive(Clone)]
pub struct PgWasteRepo {
    pool: PgPool,
}

impl PgWasteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WasteStore for PgWasteRepo {
    async fn search_by_id(&self, id: Uuid) -> Result<Option<Waste>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM wastes WHERE id = $1");
        let row = sqlx::query_as::<_, Waste>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn store(&self, waste: NewWaste) -> Result<Waste, DbError> {
        let query = format!(
            r#"
            INSERT INTO wastes
                (id, request_id, waste_type, packaging, process_status, weight_in_kg,
                 volume_in_l, description, note, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, Waste>(&query)
            .bind(Uuid::new_v4())
            .bind(waste.request_id)
            .bind(waste.waste_type)
            .bind(waste.packaging)
            .bind(waste.process_status)
            .bind(waste.weight_in_kg)
            .bind(waste.volume_in_l)
            .bind(&waste.description)
            .bind(waste.note.as_deref())
            .bind(DatetimeFormatter::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_state(&self, process_status: i32) -> Result<Vec<Waste>, DbError> {
        let query =
            format!("SELECT {COLUMNS} FROM wastes WHERE process_status = $1 ORDER BY created_at");
        let rows = sqlx::query_as::<_, Waste>(&query)
            .bind(process_status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn modify_status(&self, id: Uuid, process_status: i32) -> Result<Waste, DbError> {
        let query = format!(
            r#"
            UPDATE wastes
            SET process_status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Waste>(&query)
            .bind(id)
            .bind(process_status)
            .bind(DatetimeFormatter::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("waste", id))
    }

    async fn classify(
        &self,
        id: Uuid,
        classification: WasteClassification,
    ) -> Result<Waste, DbError> {
        let query = format!(
            r#"
            UPDATE wastes
            SET isotopes_number = $2, state_waste = $3, store_type = $4, updated_at = $5
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Waste>(&query)
            .bind(id)
            .bind(classification.isotopes_number)
            .bind(classification.state_waste)
            .bind(classification.store_type)
            .bind(DatetimeFormatter::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("waste", id))
    }
}
