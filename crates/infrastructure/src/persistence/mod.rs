//! Persistence module
//!
//! SQLite-based storage for locations, readings and the recommendation table.

pub mod air_quality_store;
pub mod connection;
pub mod database_health;
pub mod migrations;
pub mod recommendation_store;

pub use air_quality_store::SqliteAirQualityStore;
pub use connection::{ConnectionPool, DatabaseError, create_pool, open_existing};
pub use database_health::SqliteDatabaseHealth;
pub use recommendation_store::SqliteRecommendationStore;
