//! Process configuration loaded from the environment
//!
//! Every variable is read once at startup into an immutable [`AppConfig`].
//! Missing or malformed values are reported as [`ConfigError`] and abort
//! startup; nothing is read from the environment afterwards.
//!
//! A `.env` file in the working directory is loaded first via
//! [`load_dotenv`]. Variables already present in the process environment
//! win over the file.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;
use thiserror::Error;
use url::Url;

/// Default pool size when `DATABASE_MAX_CONNECTIONS` is unset
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Required variable not set
    #[error("missing required environment variable {key}")]
    Missing { key: &'static str },

    /// Variable set but not parseable
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Declares a closed set of string-valued settings with parsing and display.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => {
                        let expected: Vec<&str> =
                            $name::ALL.iter().map(|v| v.as_str()).collect();
                        Err(format!("expected one of {}", expected.join(", ")))
                    }
                }
            }
        }
    };
}

string_enum! {
    /// Deployment mode of the process
    EnvironmentMode {
        Development => "development",
        Production => "production",
    }
}

string_enum! {
    /// Log line format
    LoggingMode {
        Structured => "structured",
        Pretty => "pretty",
    }
}

string_enum! {
    /// Minimum log level
    LoggingLevel {
        Debug => "DEBUG",
        Info => "INFO",
        Warning => "WARNING",
        Error => "ERROR",
        Critical => "CRITICAL",
    }
}

string_enum! {
    /// POSIX locales the service may run under
    SupportedLocale {
        Colombia => "es_CO.UTF-8",
        Usa => "en_US.UTF-8",
    }
}

string_enum! {
    /// Timezones timestamps may be rendered in
    SupportedTimeZone {
        Colombia => "America/Bogota",
        Usa => "America/New_York",
    }
}

impl LoggingLevel {
    /// `tracing` filter directive for this level.
    ///
    /// `tracing` has no level above error, so CRITICAL maps to error.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LoggingLevel::Debug => "debug",
            LoggingLevel::Info => "info",
            LoggingLevel::Warning => "warn",
            LoggingLevel::Error | LoggingLevel::Critical => "error",
        }
    }
}

impl SupportedTimeZone {
    pub fn tz(&self) -> Tz {
        match self {
            SupportedTimeZone::Colombia => chrono_tz::America::Bogota,
            SupportedTimeZone::Usa => chrono_tz::America::New_York,
        }
    }
}

/// Application-level settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub environment_mode: EnvironmentMode,
    pub logging_mode: LoggingMode,
    pub logging_level: LoggingLevel,
    pub server_port: u16,
    /// Paths that skip the authentication middleware
    pub authentication_exclude: BTreeSet<String>,
    pub use_authentication_middleware: bool,
    pub swagger_docs: bool,
    pub posix_locale: SupportedLocale,
    pub time_zone: SupportedTimeZone,
}

/// Database connection settings
#[derive(Clone, PartialEq)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Log every executed statement
    pub logs: bool,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"***")
            .field("logs", &self.logs)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Base URLs of sibling microservices
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceUrls {
    pub warehouse_ms_base_url: Url,
    pub brms_base_url: Url,
}

/// Immutable process configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub services: ServiceUrls,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);

        let app = AppSettings {
            environment_mode: env.parse_enum("APP_ENVIRONMENT_MODE")?,
            logging_mode: env.parse_enum("APP_LOGGING_MODE")?,
            logging_level: env.parse_enum("APP_LOGGING_LEVEL")?,
            server_port: env.parse_number("APP_SERVER_PORT")?,
            authentication_exclude: env
                .parse_path_set("APP_AUTHENTICATION_HANDLER_MIDDLEWARE_EXCLUDE")?,
            use_authentication_middleware: env
                .parse_bool("APP_USE_AUTHENTICATION_HANDLER_MIDDLEWARE")?,
            swagger_docs: env.parse_bool("APP_SWAGGER_DOCS")?,
            posix_locale: env.parse_enum("APP_POSIX_LOCALE")?,
            time_zone: env.parse_enum("APP_TIME_ZONE")?,
        };

        let database = DatabaseSettings {
            password: env.required("DATABASE_PASSWORD")?,
            logs: env.parse_bool("DATABASE_LOGS")?,
            host: env.required_non_empty("DATABASE_HOST")?,
            name: env.required_non_empty("DATABASE_NAME")?,
            user: env.required_non_empty("DATABASE_USER")?,
            port: env.parse_number("DATABASE_PORT")?,
            max_connections: match env.optional("DATABASE_MAX_CONNECTIONS") {
                Some(_) => env.parse_number("DATABASE_MAX_CONNECTIONS")?,
                None => DEFAULT_MAX_CONNECTIONS,
            },
        };

        let services = ServiceUrls {
            warehouse_ms_base_url: env.parse_http_url("SAR_WAREHOUSE_MS_BASE_URL")?,
            brms_base_url: env.parse_http_url("SAR_BRMS_BASE_URL")?,
        };

        Ok(Self {
            app,
            database,
            services,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.environment_mode == EnvironmentMode::Production
    }
}

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &'static str) -> Option<String> {
        (self.0)(key)
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.optional(key).ok_or(ConfigError::Missing { key })
    }

    fn required_non_empty(&self, key: &'static str) -> Result<String, ConfigError> {
        let value = self.required(key)?;
        if value.trim().is_empty() {
            return Err(ConfigError::invalid(key, &value, "must not be empty"));
        }
        Ok(value)
    }

    fn parse_enum<T>(&self, key: &'static str) -> Result<T, ConfigError>
    where
        T: FromStr<Err = String>,
    {
        let value = self.required(key)?;
        value
            .trim()
            .parse()
            .map_err(|reason| ConfigError::invalid(key, &value, reason))
    }

    fn parse_number<T>(&self, key: &'static str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let value = self.required(key)?;
        value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(key, &value, e.to_string()))
    }

    fn parse_bool(&self, key: &'static str) -> Result<bool, ConfigError> {
        let value = self.required(key)?;
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::invalid(key, &value, "expected a boolean")),
        }
    }

    /// Accepts a JSON array of strings or a comma-separated list.
    fn parse_path_set(&self, key: &'static str) -> Result<BTreeSet<String>, ConfigError> {
        let value = self.required(key)?;
        let trimmed = value.trim();

        let items: Vec<String> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed)
                .map_err(|e| ConfigError::invalid(key, &value, e.to_string()))?
        } else {
            trimmed.split(',').map(str::to_owned).collect()
        };

        Ok(items
            .into_iter()
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty())
            .collect())
    }

    fn parse_http_url(&self, key: &'static str) -> Result<Url, ConfigError> {
        let value = self.required(key)?;
        let url = Url::parse(value.trim())
            .map_err(|e| ConfigError::invalid(key, &value, e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(key, &value, "expected an http(s) url"));
        }
        Ok(url)
    }
}

/// Load a `.env` file from the current directory (or a parent), if any.
///
/// Existing environment variables are not overwritten. Runs before logging
/// is set up, so the outcome is returned for the caller to report.
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}
