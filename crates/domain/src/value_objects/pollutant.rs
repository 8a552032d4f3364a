//! Pollutants and their measured concentrations

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A pollutant tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    /// Fine particulate matter (PM2.5)
    Pm25,
    /// Coarse particulate matter (PM10)
    Pm10,
    /// Ozone
    O3,
    /// Nitrogen dioxide
    No2,
    /// Sulphur dioxide
    So2,
    /// Carbon monoxide
    Co,
}

/// Fixed "high" cutoff per pollutant. A concentration strictly above the
/// cutoff is a risk; the cutoffs do not depend on the AQI band.
pub const HIGH_THRESHOLDS: [(Pollutant, f64); 6] = [
    (Pollutant::Pm25, 35.0),
    (Pollutant::Pm10, 150.0),
    (Pollutant::O3, 160.0),
    (Pollutant::No2, 100.0),
    (Pollutant::So2, 80.0),
    (Pollutant::Co, 10.0),
];

impl Pollutant {
    /// All pollutants in display order
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Pm25,
            Self::Pm10,
            Self::O3,
            Self::No2,
            Self::So2,
            Self::Co,
        ]
    }

    /// Machine key, matches the storage column and JSON field name
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Pm25 => "pm25",
            Self::Pm10 => "pm10",
            Self::O3 => "o3",
            Self::No2 => "no2",
            Self::So2 => "so2",
            Self::Co => "co",
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pm25 => "PM2.5",
            Self::Pm10 => "PM10",
            Self::O3 => "O₃",
            Self::No2 => "NO₂",
            Self::So2 => "SO₂",
            Self::Co => "CO",
        }
    }

    /// Display unit
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Co => "mg/m³",
            _ => "μg/m³",
        }
    }

    /// The "high" cutoff for this pollutant
    #[must_use]
    pub fn high_threshold(&self) -> f64 {
        HIGH_THRESHOLDS
            .iter()
            .find(|(p, _)| p == self)
            .map_or(f64::INFINITY, |(_, cutoff)| *cutoff)
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Pollutant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pm25" | "pm2.5" | "pm2_5" => Ok(Self::Pm25),
            "pm10" => Ok(Self::Pm10),
            "o3" => Ok(Self::O3),
            "no2" => Ok(Self::No2),
            "so2" => Ok(Self::So2),
            "co" => Ok(Self::Co),
            other => Err(format!("Unknown pollutant: {other}")),
        }
    }
}

/// Risk level of a single pollutant reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// At or below the cutoff
    Normal,
    /// Above the cutoff
    High,
}

/// Concentrations for the six tracked pollutants
///
/// Upstream data is lenient: any field may be missing. A missing field reads
/// as zero, which is never at risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantLevels {
    /// PM2.5 in μg/m³
    #[serde(default)]
    pub pm25: Option<f64>,
    /// PM10 in μg/m³
    #[serde(default)]
    pub pm10: Option<f64>,
    /// Ozone in μg/m³
    #[serde(default)]
    pub o3: Option<f64>,
    /// Nitrogen dioxide in μg/m³
    #[serde(default)]
    pub no2: Option<f64>,
    /// Sulphur dioxide in μg/m³
    #[serde(default)]
    pub so2: Option<f64>,
    /// Carbon monoxide
    #[serde(default)]
    pub co: Option<f64>,
}

impl PollutantLevels {
    /// Levels with every field missing
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pm25: None,
            pm10: None,
            o3: None,
            no2: None,
            so2: None,
            co: None,
        }
    }

    /// Builder-style setter
    #[must_use]
    pub const fn with(mut self, pollutant: Pollutant, value: f64) -> Self {
        match pollutant {
            Pollutant::Pm25 => self.pm25 = Some(value),
            Pollutant::Pm10 => self.pm10 = Some(value),
            Pollutant::O3 => self.o3 = Some(value),
            Pollutant::No2 => self.no2 = Some(value),
            Pollutant::So2 => self.so2 = Some(value),
            Pollutant::Co => self.co = Some(value),
        }
        self
    }

    /// Raw field, `None` when missing
    #[must_use]
    pub const fn raw(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::O3 => self.o3,
            Pollutant::No2 => self.no2,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
        }
    }

    /// Concentration with missing fields read as zero
    #[must_use]
    pub fn get(&self, pollutant: Pollutant) -> f64 {
        self.raw(pollutant).unwrap_or(0.0)
    }

    /// Risk level of one pollutant
    ///
    /// NaN never compares above a cutoff, so it reads as `Normal`.
    #[must_use]
    pub fn risk_level(&self, pollutant: Pollutant) -> RiskLevel {
        if self.get(pollutant) > pollutant.high_threshold() {
            RiskLevel::High
        } else {
            RiskLevel::Normal
        }
    }

    /// Whether every field is missing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pm25.is_none()
            && self.pm10.is_none()
            && self.o3.is_none()
            && self.no2.is_none()
            && self.so2.is_none()
            && self.co.is_none()
    }
}
