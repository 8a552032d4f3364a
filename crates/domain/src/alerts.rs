//! AQI alert thresholds and evaluation

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::Aqi};

/// How urgent an alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Moderate air quality
    Info,
    /// Unhealthy air quality
    Warning,
    /// Dangerous air quality
    Danger,
}

impl AlertLevel {
    /// Lowercase label, as serialized
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// An alert raised for an AQI value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AqiAlert {
    /// Urgency
    pub level: AlertLevel,
    /// Short title
    pub title: &'static str,
    /// Advice text
    pub message: &'static str,
}

/// Lower bounds (inclusive) at which each alert level fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Info alert from this AQI
    #[serde(default = "default_moderate")]
    pub moderate: f64,
    /// Warning alert from this AQI
    #[serde(default = "default_unhealthy")]
    pub unhealthy: f64,
    /// Danger alert from this AQI
    #[serde(default = "default_dangerous")]
    pub dangerous: f64,
}

const fn default_moderate() -> f64 {
    100.0
}

const fn default_unhealthy() -> f64 {
    150.0
}

const fn default_dangerous() -> f64 {
    200.0
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            moderate: default_moderate(),
            unhealthy: default_unhealthy(),
            dangerous: default_dangerous(),
        }
    }
}

impl AlertThresholds {
    /// Ensure the thresholds are finite and strictly increasing
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAlertThresholds` otherwise.
    pub fn validate(&self) -> Result<(), DomainError> {
        let values = [self.moderate, self.unhealthy, self.dangerous];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(DomainError::InvalidAlertThresholds(
                "thresholds must be finite and non-negative".to_string(),
            ));
        }
        if !(self.moderate < self.unhealthy && self.unhealthy < self.dangerous) {
            return Err(DomainError::InvalidAlertThresholds(format!(
                "thresholds must be strictly increasing, got {} / {} / {}",
                self.moderate, self.unhealthy, self.dangerous
            )));
        }
        Ok(())
    }
}

/// Most severe alert whose threshold `aqi` reaches
#[must_use]
pub fn evaluate_alert(aqi: Aqi, thresholds: &AlertThresholds) -> Option<AqiAlert> {
    let value = aqi.value();
    if value >= thresholds.dangerous {
        Some(AqiAlert {
            level: AlertLevel::Danger,
            title: "Dangerous Air Quality",
            message: "AQI is extremely high. Stay indoors and avoid all outdoor activities.",
        })
    } else if value >= thresholds.unhealthy {
        Some(AqiAlert {
            level: AlertLevel::Warning,
            title: "Unhealthy Air Quality",
            message: "AQI is unhealthy. Limit outdoor exposure and consider wearing masks.",
        })
    } else if value >= thresholds.moderate {
        Some(AqiAlert {
            level: AlertLevel::Info,
            title: "Moderate Air Quality",
            message: "AQI is moderate. Sensitive individuals should limit prolonged outdoor activities.",
        })
    } else {
        None
    }
}
