//! Air quality storage port
//!
//! Locations and their readings. Readings are append-only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{AirQualityReading, Location, LocationId, NewReading};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for location and reading persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AirQualityStore: Send + Sync {
    /// All known locations, ordered by id
    async fn list_locations(&self) -> Result<Vec<Location>, ApplicationError>;

    /// A single location
    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, ApplicationError>;

    /// Most recent reading for a location
    async fn latest_reading(
        &self,
        location_id: LocationId,
    ) -> Result<Option<AirQualityReading>, ApplicationError>;

    /// Up to `limit` readings, newest first
    async fn history(
        &self,
        location_id: LocationId,
        limit: u32,
    ) -> Result<Vec<AirQualityReading>, ApplicationError>;

    /// Readings recorded at or after `since`, oldest first
    async fn readings_since(
        &self,
        location_id: LocationId,
        since: DateTime<Utc>,
    ) -> Result<Vec<AirQualityReading>, ApplicationError>;

    /// Store a reading and return it with its identifier
    async fn insert_reading(
        &self,
        reading: &NewReading,
    ) -> Result<AirQualityReading, ApplicationError>;
}
