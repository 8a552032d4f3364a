//! Health advisories derived from an AQI value
//!
//! An advisory bundles the band, the stored recommendation (or a generic
//! fallback when none covers the value), the health impact level, activity
//! guidance, pollutant risks and any alert.

use serde::Serialize;

use crate::{
    alerts::{AlertThresholds, AqiAlert, evaluate_alert},
    classifier::{PollutantRisk, pollutant_risks},
    entities::HealthRecommendation,
    recommendation_table::RecommendationTable,
    value_objects::{Aqi, AqiBand, PollutantLevels},
};

/// Overall health impact of a band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HealthImpact {
    /// Good air
    Low,
    /// Moderate air
    Moderate,
    /// Unhealthy for sensitive groups
    High,
    /// Unhealthy
    #[serde(rename = "Very High")]
    VeryHigh,
    /// Very unhealthy or hazardous
    Extreme,
}

impl HealthImpact {
    /// Impact level for a band
    #[must_use]
    pub const fn for_band(band: AqiBand) -> Self {
        match band {
            AqiBand::Good => Self::Low,
            AqiBand::Moderate => Self::Moderate,
            AqiBand::UnhealthyForSensitiveGroups => Self::High,
            AqiBand::Unhealthy => Self::VeryHigh,
            AqiBand::VeryUnhealthy | AqiBand::Hazardous => Self::Extreme,
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }
}

/// Kind of everyday activity covered by guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    /// Being outdoors in general
    Outdoor,
    /// Outdoor exercise
    Exercise,
    /// Keeping windows open
    Windows,
    /// Precautions for sensitive groups
    SensitiveGroups,
}

impl Activity {
    /// Machine key, as serialized
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Outdoor => "outdoor",
            Self::Exercise => "exercise",
            Self::Windows => "windows",
            Self::SensitiveGroups => "sensitive_groups",
        }
    }
}

/// Whether an activity is advisable at the current AQI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityGuidance {
    /// Which activity
    pub activity: Activity,
    /// Whether it is safe
    pub safe: bool,
    /// Advice text
    pub message: &'static str,
}

const fn guidance(activity: Activity, safe: bool, message: &'static str) -> ActivityGuidance {
    ActivityGuidance {
        activity,
        safe,
        message,
    }
}

/// Guidance for outdoor, exercise, windows and sensitive groups
#[must_use]
pub const fn activity_guidance(band: AqiBand) -> [ActivityGuidance; 4] {
    use Activity::{Exercise, Outdoor, SensitiveGroups, Windows};

    match band {
        AqiBand::Good => [
            guidance(Outdoor, true, "Perfect for all outdoor activities"),
            guidance(Exercise, true, "Ideal conditions for exercise"),
            guidance(Windows, true, "Safe to keep windows open"),
            guidance(SensitiveGroups, true, "No special precautions needed"),
        ],
        AqiBand::Moderate => [
            guidance(Outdoor, true, "Good for most outdoor activities"),
            guidance(Exercise, true, "Exercise is generally safe"),
            guidance(Windows, true, "Windows can remain open"),
            guidance(
                SensitiveGroups,
                false,
                "Sensitive individuals should monitor symptoms",
            ),
        ],
        AqiBand::UnhealthyForSensitiveGroups => [
            guidance(Outdoor, false, "Limit prolonged outdoor activities"),
            guidance(Exercise, false, "Reduce intense outdoor exercise"),
            guidance(Windows, false, "Consider closing windows"),
            guidance(SensitiveGroups, false, "Sensitive groups should stay indoors"),
        ],
        AqiBand::Unhealthy => [
            guidance(Outdoor, false, "Avoid outdoor activities"),
            guidance(Exercise, false, "Avoid outdoor exercise"),
            guidance(Windows, false, "Keep windows closed"),
            guidance(
                SensitiveGroups,
                false,
                "Everyone should limit outdoor exposure",
            ),
        ],
        AqiBand::VeryUnhealthy | AqiBand::Hazardous => [
            guidance(Outdoor, false, "Stay indoors"),
            guidance(Exercise, false, "Avoid all outdoor exercise"),
            guidance(Windows, false, "Keep windows closed, use air purifiers"),
            guidance(SensitiveGroups, false, "Health alert - stay indoors"),
        ],
    }
}

/// Everything the dashboard shows about one AQI value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthAdvisory {
    /// The value advised on
    pub aqi: Aqi,
    /// Its band
    pub band: AqiBand,
    /// Stored recommendation, or a generic one when `fallback` is set
    pub recommendation: HealthRecommendation,
    /// Set when no stored range covered the value
    pub fallback: bool,
    /// Health impact level
    pub health_impact: HealthImpact,
    /// Per-activity guidance
    pub activities: Vec<ActivityGuidance>,
    /// Flagged pollutants with advice
    pub pollutant_risks: Vec<PollutantRisk>,
    /// Alert for this value, if any
    pub alert: Option<AqiAlert>,
}

impl HealthAdvisory {
    /// Build an advisory
    ///
    /// The recommendation lookup uses the value rounded up to a whole AQI since
    /// stored ranges are whole numbers. `RecommendationNotFound` falls back to
    /// the band's generic record; no other error is possible.
    #[must_use]
    pub fn build(
        aqi: Aqi,
        pollutants: &PollutantLevels,
        table: &RecommendationTable,
        thresholds: &AlertThresholds,
    ) -> Self {
        let band = aqi.band();
        let (recommendation, fallback) = match table.resolve(aqi.lookup_key()) {
            Ok(record) => (record.clone(), false),
            Err(_) => (HealthRecommendation::fallback_for(band), true),
        };

        Self {
            aqi,
            band,
            recommendation,
            fallback,
            health_impact: HealthImpact::for_band(band),
            activities: activity_guidance(band).to_vec(),
            pollutant_risks: pollutant_risks(pollutants),
            alert: evaluate_alert(aqi, thresholds),
        }
    }
}
