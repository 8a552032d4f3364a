//! Application services - Use case implementations

mod air_quality_service;
mod health_advisory_service;

pub use air_quality_service::{AirQualityService, AirQualityServiceConfig};
pub use health_advisory_service::HealthAdvisoryService;
