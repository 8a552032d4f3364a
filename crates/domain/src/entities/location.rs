//! Monitored location entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{GeoLocation, LocationId};

/// A named area whose air quality is tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Storage-assigned identifier
    pub id: LocationId,
    /// Display name, e.g. "Koramangala"
    pub name: String,
    /// Where upstream data is fetched for
    pub coordinates: GeoLocation,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(id: LocationId, name: impl Into<String>, coordinates: GeoLocation) -> Self {
        Self {
            id,
            name: name.into(),
            coordinates,
        }
    }
}
