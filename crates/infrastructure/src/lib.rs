//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: SQLite persistence,
//! the OpenWeather pollution source, configuration and logging.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;
pub mod validation;

pub use adapters::*;
pub use config::{
    AppConfig, DatabaseConfig, Environment, OpenWeatherAppConfig, RecommendationsConfig,
    ServerConfig, TelemetryAppConfig,
};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteAirQualityStore, SqliteDatabaseHealth,
    SqliteRecommendationStore, create_pool, open_existing,
};
pub use telemetry::{LogFormat, TelemetryError, init_tracing};
pub use validation::{ConfigValidator, ConfigWarning, WarningSeverity};
