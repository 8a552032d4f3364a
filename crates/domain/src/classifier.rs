//! AQI classification and pollutant risk checks
//!
//! Everything here is pure: the same input always gives the same band and
//! the same flags.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{
    errors::DomainError,
    value_objects::{Aqi, AqiBand, Pollutant, PollutantLevels, RiskLevel},
};

/// Classify a raw AQI value
///
/// # Errors
///
/// Returns `DomainError::InvalidAqi` for negative or non-finite input.
pub fn classify(aqi: f64) -> Result<AqiBand, DomainError> {
    Ok(Aqi::new(aqi)?.band())
}

/// Band of a value that may be missing or invalid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A valid AQI and its band
    Known(AqiBand),
    /// Missing or invalid AQI
    Unknown,
}

impl Classification {
    /// The band, if known
    #[must_use]
    pub const fn band(&self) -> Option<AqiBand> {
        match self {
            Self::Known(band) => Some(*band),
            Self::Unknown => None,
        }
    }

    /// Category label, "Unknown" when not classified
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Known(band) => band.category(),
            Self::Unknown => "Unknown",
        }
    }

    /// Colour token, "aqi-unknown" when not classified
    #[must_use]
    pub const fn color_token(&self) -> &'static str {
        match self {
            Self::Known(band) => band.color_token(),
            Self::Unknown => "aqi-unknown",
        }
    }

    /// Severity rank, `None` when not classified
    #[must_use]
    pub const fn severity_rank(&self) -> Option<u8> {
        match self {
            Self::Known(band) => Some(band.severity_rank()),
            Self::Unknown => None,
        }
    }
}

impl From<AqiBand> for Classification {
    fn from(band: AqiBand) -> Self {
        Self::Known(band)
    }
}

/// Classify without failing; bad or missing input becomes `Unknown`
#[must_use]
pub fn classify_lenient(aqi: Option<f64>) -> Classification {
    aqi.and_then(|value| classify(value).ok())
        .map_or(Classification::Unknown, Classification::Known)
}

/// Pollutants strictly above their fixed cutoff
#[must_use]
pub fn risk_flags(levels: &PollutantLevels) -> BTreeSet<Pollutant> {
    Pollutant::all()
        .into_iter()
        .filter(|p| levels.risk_level(*p) == RiskLevel::High)
        .collect()
}

/// A flagged pollutant with advice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantRisk {
    /// Which pollutant
    pub pollutant: Pollutant,
    /// Measured concentration
    pub value: f64,
    /// Cutoff that was exceeded
    pub threshold: f64,
    /// Always `High` for flagged pollutants
    pub level: RiskLevel,
    /// Main health effect
    pub health_risk: &'static str,
    /// Suggested action
    pub action: &'static str,
}

const fn risk_text(pollutant: Pollutant) -> (&'static str, &'static str) {
    match pollutant {
        Pollutant::Pm25 => (
            "Respiratory and cardiovascular issues",
            "Use N95 masks outdoors, consider air purifiers",
        ),
        Pollutant::Pm10 => (
            "Eye and throat irritation",
            "Limit outdoor activities, protect eyes",
        ),
        Pollutant::O3 => (
            "Breathing difficulties, chest pain",
            "Avoid outdoor exercise, especially in afternoon",
        ),
        Pollutant::No2 => (
            "Respiratory inflammation",
            "Avoid busy roads, use alternative routes",
        ),
        Pollutant::So2 => (
            "Airway constriction, worse for asthmatics",
            "Stay away from industrial areas, keep inhalers at hand",
        ),
        Pollutant::Co => (
            "Reduced oxygen delivery, headaches and dizziness",
            "Avoid heavy traffic and enclosed spaces with combustion sources",
        ),
    }
}

/// Risk records for every flagged pollutant, in display order
#[must_use]
pub fn pollutant_risks(levels: &PollutantLevels) -> Vec<PollutantRisk> {
    risk_flags(levels)
        .into_iter()
        .map(|pollutant| {
            let (health_risk, action) = risk_text(pollutant);
            PollutantRisk {
                pollutant,
                value: levels.get(pollutant),
                threshold: pollutant.high_threshold(),
                level: RiskLevel::High,
                health_risk,
                action,
            }
        })
        .collect()
}
