//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod air_quality_store;
mod database_health_port;
mod pollution_data_port;
mod recommendation_store;

pub use air_quality_store::AirQualityStore;
#[cfg(test)]
pub use air_quality_store::MockAirQualityStore;
#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use pollution_data_port::MockPollutionDataPort;
pub use pollution_data_port::{PollutionDataPort, PollutionSnapshot};
#[cfg(test)]
pub use recommendation_store::MockRecommendationStore;
pub use recommendation_store::RecommendationStore;
