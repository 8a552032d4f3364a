//! Air quality reading entity

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    classifier::{self, Classification},
    value_objects::{Aqi, InvalidAqi, LocationId, Pollutant, PollutantLevels},
};

/// A stored reading for one location at one point in time
///
/// `aqi` is kept raw: rows written by other tools may hold values the
/// classifier rejects, and those must still be listable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    /// Row identifier
    pub id: i64,
    /// Location this reading belongs to
    pub location_id: LocationId,
    /// AQI as stored
    pub aqi: f64,
    /// Pollutant concentrations, any of which may be missing
    pub pollutants: PollutantLevels,
    /// When the reading was recorded
    pub recorded_at: DateTime<Utc>,
}

impl AirQualityReading {
    /// Validated AQI of this reading
    pub fn validated_aqi(&self) -> Result<Aqi, InvalidAqi> {
        Aqi::new(self.aqi)
    }

    /// Band for this reading, `Unknown` when the stored AQI is invalid
    #[must_use]
    pub fn classification(&self) -> Classification {
        classifier::classify_lenient(Some(self.aqi))
    }

    /// Pollutants above their cutoff
    #[must_use]
    pub fn risk_flags(&self) -> BTreeSet<Pollutant> {
        classifier::risk_flags(&self.pollutants)
    }
}

/// A reading that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    /// Location the reading is for
    pub location_id: LocationId,
    /// Validated AQI
    pub aqi: Aqi,
    /// Pollutant concentrations
    pub pollutants: PollutantLevels,
    /// Capture time
    pub recorded_at: DateTime<Utc>,
}

impl NewReading {
    /// Create a reading stamped with the current time
    #[must_use]
    pub fn now(location_id: LocationId, aqi: Aqi, pollutants: PollutantLevels) -> Self {
        Self {
            location_id,
            aqi,
            pollutants,
            recorded_at: Utc::now(),
        }
    }

    /// Attach the storage identifier
    #[must_use]
    pub fn into_stored(self, id: i64) -> AirQualityReading {
        AirQualityReading {
            id,
            location_id: self.location_id,
            aqi: self.aqi.value(),
            pollutants: self.pollutants,
            recorded_at: self.recorded_at,
        }
    }
}
