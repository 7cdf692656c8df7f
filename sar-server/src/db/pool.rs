//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits, built from the
//! `DATABASE_*` settings.

use sar_core::config::{DatabaseSettings, DEFAULT_MAX_CONNECTIONS};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

/// Create a PostgreSQL connection pool.
///
/// Connects eagerly, so an unreachable database fails here rather than on
/// the first request.
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::from_env()?;
/// let pool = create_pool(&config.database).await?;
/// ```
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(connect_options(settings), settings.max_connections).await
}

/// Create a PostgreSQL connection pool with custom options.
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    let max_connections = if max_connections == 0 {
        DEFAULT_MAX_CONNECTIONS
    } else {
        max_connections
    };

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Connection options for the configured database.
///
/// Statement logging stays on (at sqlx's default levels) only when
/// `DATABASE_LOGS` is enabled.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name);

    if settings.logs {
        options
    } else {
        options.disable_statement_logging()
    }
}

/// Startup connectivity check.
pub async fn probe(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
