//! Upstream pollution data port
//!
//! Defines the interface for fetching current pollution for a coordinate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::value_objects::{Aqi, GeoLocation, PollutantLevels};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Current pollution at a point, already on the dashboard's AQI scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutionSnapshot {
    /// AQI on the 0-500 scale
    pub aqi: Aqi,
    /// Component concentrations
    pub pollutants: PollutantLevels,
    /// When the upstream measured it
    ///
    /// Logged only. Stored readings are stamped with the fetch time.
    pub observed_at: DateTime<Utc>,
}

/// Port for pollution data retrieval
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PollutionDataPort: Send + Sync {
    /// Current pollution at a location
    async fn current_pollution(
        &self,
        location: &GeoLocation,
    ) -> Result<PollutionSnapshot, ApplicationError>;

    /// Whether the upstream can be called at all (e.g. an API key is set)
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn PollutionDataPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn PollutionDataPort>();
    }
}
