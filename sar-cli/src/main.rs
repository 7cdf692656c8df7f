use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sar_core::config::{self, AppConfig};
use tracing::{debug, info, warn};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sar-ms",
    author,
    version,
    about = "SAR microservice: collect requests, wastes and their classification",
    long_about = "REST service that records waste collect requests, tracks the process status \
                  of requests and wastes, and validates every reference code against the \
                  parameter table. Configuration is read from the environment (and .env)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve(commands::ServeArgs),
    /// Check that the configured database is reachable
    CheckDb,
    /// Create the database tables if they do not exist
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = config::load_dotenv();
    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing_setup::init_tracing(&TracingConfig::from_app_config(&config)).ok();
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => debug!("no .env file found"),
        Err(e) => warn!("failed to read .env file: {}", e),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(config, args).await?,
        Commands::CheckDb => commands::run_check_db(&config).await?,
        Commands::Migrate => commands::run_migrate(&config).await?,
    }
    Ok(())
}
