//! AQI severity bands
//!
//! The six bands partition `[0, ∞)`. Upper bounds are inclusive, so a value
//! sitting exactly on a boundary belongs to the lower band; the last band has
//! no upper bound.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Aqi;

/// Ordered severity band for an AQI value
///
/// Declaration order is severity order, so `Ord` compares by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiBand {
    /// 0 to 50
    Good,
    /// 51 to 100
    Moderate,
    /// 101 to 150
    UnhealthyForSensitiveGroups,
    /// 151 to 200
    Unhealthy,
    /// 201 to 300
    VeryUnhealthy,
    /// Above 300
    Hazardous,
}

/// Inclusive upper bound of every bounded band, lowest first.
///
/// Anything above the last entry is [`AqiBand::Hazardous`].
pub const BAND_UPPER_BOUNDS: [(f64, AqiBand); 5] = [
    (50.0, AqiBand::Good),
    (100.0, AqiBand::Moderate),
    (150.0, AqiBand::UnhealthyForSensitiveGroups),
    (200.0, AqiBand::Unhealthy),
    (300.0, AqiBand::VeryUnhealthy),
];

impl AqiBand {
    /// Find the band for a validated AQI
    #[must_use]
    pub fn from_aqi(aqi: Aqi) -> Self {
        let value = aqi.value();
        BAND_UPPER_BOUNDS
            .iter()
            .find(|(upper, _)| value <= *upper)
            .map_or(Self::Hazardous, |(_, band)| *band)
    }

    /// Human-readable category name
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }

    /// Display colour token used by the dashboard theme
    #[must_use]
    pub const fn color_token(&self) -> &'static str {
        match self {
            Self::Good => "aqi-good",
            Self::Moderate => "aqi-moderate",
            Self::UnhealthyForSensitiveGroups => "aqi-unhealthy-sensitive",
            Self::Unhealthy => "aqi-unhealthy",
            Self::VeryUnhealthy => "aqi-very-unhealthy",
            Self::Hazardous => "aqi-hazardous",
        }
    }

    /// Severity rank, 0 (Good) through 5 (Hazardous)
    #[must_use]
    pub const fn severity_rank(&self) -> u8 {
        match self {
            Self::Good => 0,
            Self::Moderate => 1,
            Self::UnhealthyForSensitiveGroups => 2,
            Self::Unhealthy => 3,
            Self::VeryUnhealthy => 4,
            Self::Hazardous => 5,
        }
    }

    /// Inclusive upper bound, `None` for the open-ended top band
    #[must_use]
    pub const fn upper_bound(&self) -> Option<f64> {
        match self {
            Self::Good => Some(50.0),
            Self::Moderate => Some(100.0),
            Self::UnhealthyForSensitiveGroups => Some(150.0),
            Self::Unhealthy => Some(200.0),
            Self::VeryUnhealthy => Some(300.0),
            Self::Hazardous => None,
        }
    }

    /// All bands, least severe first
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Good,
            Self::Moderate,
            Self::UnhealthyForSensitiveGroups,
            Self::Unhealthy,
            Self::VeryUnhealthy,
            Self::Hazardous,
        ]
    }
}

impl fmt::Display for AqiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category())
    }
}
