//! Schema setup for the SAR tables
//!
//! The `parameters` table is owned by another system in production; it is
//! created here only so a fresh database can serve requests.

use sqlx::PgPool;

/// Create all tables if they don't exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running SAR migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parameters (
            id INTEGER NOT NULL,
            domain TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (domain, id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS collect_requests (
            id UUID PRIMARY KEY,
            collect_date DATE NOT NULL,
            process_status INTEGER NOT NULL,
            production_center_id INTEGER NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS wastes (
            id UUID PRIMARY KEY,
            request_id UUID NOT NULL REFERENCES collect_requests(id),
            waste_type INTEGER NOT NULL,
            packaging INTEGER NOT NULL,
            process_status INTEGER NOT NULL,
            weight_in_kg NUMERIC NOT NULL,
            volume_in_l NUMERIC NOT NULL,
            isotopes_number NUMERIC,
            state_waste INTEGER,
            store_type INTEGER,
            description TEXT NOT NULL,
            note TEXT,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_collect_requests_status ON collect_requests(process_status)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_wastes_status ON wastes(process_status)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_wastes_request ON wastes(request_id)")
        .execute(pool)
        .await?;

    tracing::info!("SAR migrations complete");
    Ok(())
}
