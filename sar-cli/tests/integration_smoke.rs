//! Smoke tests for the sar-ms binary wiring

use assert_cmd::Command;
use predicates::prelude::*;

const APP_VARS: &[&str] = &[
    "APP_ENVIRONMENT_MODE",
    "APP_LOGGING_MODE",
    "APP_LOGGING_LEVEL",
    "APP_SERVER_PORT",
    "APP_AUTHENTICATION_HANDLER_MIDDLEWARE_EXCLUDE",
    "APP_USE_AUTHENTICATION_HANDLER_MIDDLEWARE",
    "APP_SWAGGER_DOCS",
    "APP_POSIX_LOCALE",
    "APP_TIME_ZONE",
    "DATABASE_PASSWORD",
    "DATABASE_HOST",
    "DATABASE_NAME",
    "DATABASE_USER",
    "DATABASE_PORT",
    "DATABASE_LOGS",
    "DATABASE_MAX_CONNECTIONS",
    "SAR_WAREHOUSE_MS_BASE_URL",
    "SAR_BRMS_BASE_URL",
];

/// Binary run from an empty directory with no SAR variables set
fn bare_command() -> Command {
    let mut cmd = Command::cargo_bin("sar-ms").unwrap();
    cmd.current_dir(std::env::temp_dir());
    for var in APP_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("sar-ms").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check-db"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("sar-ms").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Port to bind"));
}

#[test]
fn test_missing_configuration_fails() {
    let mut cmd = bare_command();
    cmd.arg("check-db");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn test_invalid_time_zone_fails() {
    let mut cmd = bare_command();
    cmd.arg("check-db")
        .env("APP_ENVIRONMENT_MODE", "development")
        .env("APP_LOGGING_MODE", "pretty")
        .env("APP_LOGGING_LEVEL", "INFO")
        .env("APP_SERVER_PORT", "8000")
        .env("APP_AUTHENTICATION_HANDLER_MIDDLEWARE_EXCLUDE", "/rest/heart-beat")
        .env("APP_USE_AUTHENTICATION_HANDLER_MIDDLEWARE", "false")
        .env("APP_SWAGGER_DOCS", "false")
        .env("APP_POSIX_LOCALE", "en_US.UTF-8")
        .env("APP_TIME_ZONE", "Europe/Paris");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("APP_TIME_ZONE"));
}

#[test]
fn test_missing_env_file_is_logged_after_tracing_starts() {
    let mut cmd = bare_command();
    cmd.arg("check-db")
        .env("RUST_LOG", "debug")
        .env("APP_ENVIRONMENT_MODE", "development")
        .env("APP_LOGGING_MODE", "pretty")
        .env("APP_LOGGING_LEVEL", "DEBUG")
        .env("APP_SERVER_PORT", "8000")
        .env("APP_AUTHENTICATION_HANDLER_MIDDLEWARE_EXCLUDE", "/rest/heart-beat")
        .env("APP_USE_AUTHENTICATION_HANDLER_MIDDLEWARE", "false")
        .env("APP_SWAGGER_DOCS", "false")
        .env("APP_POSIX_LOCALE", "en_US.UTF-8")
        .env("APP_TIME_ZONE", "America/Bogota")
        .env("DATABASE_PASSWORD", "secret")
        .env("DATABASE_HOST", "db.invalid")
        .env("DATABASE_NAME", "sar")
        .env("DATABASE_USER", "sar")
        .env("DATABASE_PORT", "5432")
        .env("DATABASE_LOGS", "false")
        .env("SAR_WAREHOUSE_MS_BASE_URL", "http://warehouse.local")
        .env("SAR_BRMS_BASE_URL", "http://brms.local");

    cmd.assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("no .env file found"));
}
