//! Application state shared across handlers

use std::sync::Arc;

use application::{AirQualityService, DatabaseHealthPort, HealthAdvisoryService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Locations, readings, refresh and analytics
    pub air_quality: Arc<AirQualityService>,
    /// Recommendation table, alerts and advisories
    pub advisory: Arc<HealthAdvisoryService>,
    /// Database probe for readiness
    pub database: Arc<dyn DatabaseHealthPort>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("air_quality", &self.air_quality)
            .field("records", &self.advisory.table().len())
            .finish_non_exhaustive()
    }
}
