//! Health recommendation record

use serde::{Deserialize, Serialize};

use crate::value_objects::{Aqi, AqiBand};

/// Range-to-message mapping for health advice
///
/// `aqi_max = None` marks an open-ended top range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthRecommendation {
    /// Inclusive lower bound
    pub aqi_min: u32,
    /// Inclusive upper bound, `None` for no upper bound
    pub aqi_max: Option<u32>,
    /// Main recommendation text
    pub message: String,
    /// Guidance on outdoor activities
    pub activity_guidance: String,
}

impl HealthRecommendation {
    /// Create a bounded record
    #[must_use]
    pub fn new(
        aqi_min: u32,
        aqi_max: u32,
        message: impl Into<String>,
        activity_guidance: impl Into<String>,
    ) -> Self {
        Self {
            aqi_min,
            aqi_max: Some(aqi_max),
            message: message.into(),
            activity_guidance: activity_guidance.into(),
        }
    }

    /// Create a record with no upper bound
    #[must_use]
    pub fn open_ended(
        aqi_min: u32,
        message: impl Into<String>,
        activity_guidance: impl Into<String>,
    ) -> Self {
        Self {
            aqi_min,
            aqi_max: None,
            message: message.into(),
            activity_guidance: activity_guidance.into(),
        }
    }

    /// Whether `aqi` lies in `[aqi_min, aqi_max]`
    #[must_use]
    pub fn contains(&self, aqi: Aqi) -> bool {
        let value = aqi.value();
        value >= f64::from(self.aqi_min) && self.aqi_max.is_none_or(|max| value <= f64::from(max))
    }

    /// Whether `aqi_min > aqi_max`
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.aqi_max.is_some_and(|max| self.aqi_min > max)
    }

    /// Generic advice used when no stored record covers a value
    #[must_use]
    pub fn fallback_for(band: AqiBand) -> Self {
        let (message, guidance) = match band {
            AqiBand::Good => (
                "Air quality is satisfactory.",
                "Outdoor activities are fine.",
            ),
            AqiBand::Moderate => (
                "Air quality is acceptable for most people.",
                "Unusually sensitive people should consider reducing prolonged outdoor exertion.",
            ),
            AqiBand::UnhealthyForSensitiveGroups => (
                "Members of sensitive groups may experience health effects.",
                "Sensitive groups should reduce prolonged outdoor exertion.",
            ),
            AqiBand::Unhealthy => (
                "Everyone may begin to experience health effects.",
                "Limit outdoor activities.",
            ),
            AqiBand::VeryUnhealthy | AqiBand::Hazardous => (
                "Health alert: everyone may experience serious health effects.",
                "Avoid all outdoor activities.",
            ),
        };
        let (aqi_min, aqi_max) = whole_range(band);
        Self {
            aqi_min,
            aqi_max,
            message: message.to_string(),
            activity_guidance: guidance.to_string(),
        }
    }
}

/// Whole-AQI range of a band
const fn whole_range(band: AqiBand) -> (u32, Option<u32>) {
    match band {
        AqiBand::Good => (0, Some(50)),
        AqiBand::Moderate => (51, Some(100)),
        AqiBand::UnhealthyForSensitiveGroups => (101, Some(150)),
        AqiBand::Unhealthy => (151, Some(200)),
        AqiBand::VeryUnhealthy => (201, Some(300)),
        AqiBand::Hazardous => (301, None),
    }
}
