//! sar-core: shared building blocks for the SAR microservice
//!
//! - [`config`]: environment-driven, immutable process configuration
//! - [`dto`]: request/response shapes exchanged over REST
//! - [`validation`]: input checks shared by DTOs and the domain cores
//! - [`datetime`]: timezone-aware rendering of stored timestamps
//! - [`domains`]: parameter domain names and fixed status codes

pub mod config;
pub mod datetime;
pub mod domains;
pub mod dto;
pub mod validation;

pub use config::{AppConfig, ConfigError};
pub use datetime::DatetimeFormatter;
pub use validation::ValidationError;
