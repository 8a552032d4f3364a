//! Domain entities - Objects with identity and lifecycle

mod air_quality_reading;
mod health_recommendation;
mod location;

pub use air_quality_reading::{AirQualityReading, NewReading};
pub use health_recommendation::HealthRecommendation;
pub use location::Location;
