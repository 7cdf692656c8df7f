//! Subcommand implementations

use anyhow::{Context, Result};
use clap::Parser;
use sar_core::{AppConfig, DatetimeFormatter};
use sar_server::db::{migrations, PgPool};
use sar_server::{create_pool, probe, run_server, AppState, ServerConfig, Stores};
use tracing::{error, info};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to bind the HTTP server to (overrides APP_SERVER_PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

pub async fn run_serve(config: AppConfig, args: ServeArgs) -> Result<()> {
    let app = &config.app;
    info!(
        logging_mode = %app.logging_mode,
        logging_level = %app.logging_level,
        "logging configured"
    );
    info!(enabled = app.swagger_docs, "api docs");
    info!(enabled = app.use_authentication_middleware, "authentication middleware");

    let pool = connect(&config).await?;

    let mut server_config = ServerConfig::from_app_config(&config);
    if let Some(port) = args.port {
        server_config.bind_addr.set_port(port);
    }
    info!(
        port = server_config.bind_addr.port(),
        time_zone = %app.time_zone,
        locale = %app.posix_locale,
        environment = %app.environment_mode,
        "starting SAR microservice"
    );

    let formatter = DatetimeFormatter::new(app.time_zone.tz());
    let state = AppState::new(Stores::postgres(pool), formatter);
    run_server(state, server_config)
        .await
        .context("HTTP server failed")?;
    Ok(())
}

pub async fn run_check_db(config: &AppConfig) -> Result<()> {
    connect(config).await?;
    println!(
        "database {} at {}:{} is reachable",
        config.database.name, config.database.host, config.database.port
    );
    Ok(())
}

pub async fn run_migrate(config: &AppConfig) -> Result<()> {
    let pool = connect(config).await?;
    migrations::run(&pool)
        .await
        .context("failed to create database tables")?;
    info!("migrations complete");
    Ok(())
}

/// Open the pool and run the startup probe. Any failure is fatal.
async fn connect(config: &AppConfig) -> Result<PgPool> {
    let database = &config.database;
    let pool = match create_pool(database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!(host = %database.host, port = database.port, "database connection failed: {}", e);
            return Err(e).context("failed to connect to database");
        }
    };

    if let Err(e) = probe(&pool).await {
        error!("database probe failed: {}", e);
        return Err(e).context("database probe failed");
    }
    info!(database = %database.name, "database connection established");
    Ok(pool)
}
