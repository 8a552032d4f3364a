//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `database`: SQLite database settings
//! - `openweather`: upstream air-pollution API
//! - `recommendations`: recommendation table checks
//! - `telemetry`: log filtering

mod database;
mod openweather;
mod recommendations;
mod server;
mod telemetry;

use domain::AlertThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use database::DatabaseConfig;
pub use openweather::OpenWeatherAppConfig;
pub use recommendations::RecommendationsConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryAppConfig;

use crate::validation::{ConfigValidator, ConfigWarning};

/// Prefix for environment overrides, e.g. `AIRWATCH_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "AIRWATCH";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Controls validation strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment - relaxed warnings
    #[default]
    Development,
    /// Production environment - strict validation
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// OpenWeather air-pollution API
    #[serde(default)]
    pub openweather: OpenWeatherAppConfig,

    /// Recommendation table checks
    #[serde(default)]
    pub recommendations: RecommendationsConfig,

    /// AQI alert thresholds
    #[serde(default)]
    pub alerts: AlertThresholds,

    /// Log filtering
    #[serde(default)]
    pub telemetry: TelemetryAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file (optional, extension inferred)
    /// layered under environment overrides
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Check the configuration, most severe findings first
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigWarning> {
        ConfigValidator::validate(self)
    }

    /// Whether this is a production deployment
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}
