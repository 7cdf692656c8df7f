//! Tracing setup for the sar-ms binary
//!
//! Usage:
//!   APP_LOGGING_MODE=pretty sar-ms serve      # Compact human-readable lines
//!   APP_LOGGING_MODE=structured sar-ms serve  # One JSON object per line
//!   RUST_LOG=sar_server=debug sar-ms serve    # Overrides APP_LOGGING_LEVEL

use anyhow::{anyhow, Result};
use sar_core::config::{AppConfig, LoggingLevel, LoggingMode};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub mode: LoggingMode,
    pub level: LoggingLevel,
    /// Show event targets (development mode)
    pub show_target: bool,
    /// Emit every SQL statement at debug level
    pub sql_statements: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            mode: LoggingMode::Pretty,
            level: LoggingLevel::Info,
            show_target: false,
            sql_statements: false,
        }
    }
}

impl TracingConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            mode: config.app.logging_mode,
            level: config.app.logging_level,
            show_target: !config.is_production(),
            sql_statements: config.database.logs,
        }
    }

    /// Filter directives used when `RUST_LOG` is unset
    pub fn directives(&self) -> String {
        let mut directives = self.level.as_filter().to_string();
        if self.sql_statements {
            directives.push_str(",sqlx::query=debug");
        }
        directives
    }
}

pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()));

    match config.mode {
        LoggingMode::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_target)
            .compact()
            .try_init(),
        LoggingMode::Structured => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .try_init(),
    }
    .map_err(|err| anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_maps_to_error_filter() {
        let config = TracingConfig {
            level: LoggingLevel::Critical,
            ..TracingConfig::default()
        };
        assert_eq!(config.directives(), "error");
    }

    #[test]
    fn sql_statements_add_sqlx_directive() {
        let config = TracingConfig {
            level: LoggingLevel::Warning,
            sql_statements: true,
            ..TracingConfig::default()
        };
        assert_eq!(config.directives(), "warn,sqlx::query=debug");
    }
}
