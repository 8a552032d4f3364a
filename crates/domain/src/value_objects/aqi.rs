//! Air Quality Index value object
//!
//! Represents a validated AQI reading: a finite, non-negative real number.
//! The value is always produced elsewhere (sensor or upstream API); this type
//! only guarantees that it is something the classifier can work with.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::Aqi;
//!
//! let aqi = Aqi::new(42.0).expect("valid AQI");
//! assert!((aqi.value() - 42.0).abs() < f64::EPSILON);
//!
//! assert!(Aqi::new(-1.0).is_err());
//! assert!(Aqi::new(f64::NAN).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use super::AqiBand;

/// Error returned when a value cannot be used as an AQI
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvalidAqi {
    /// NaN or infinite input
    #[error("AQI must be a finite number, got {0}")]
    NotFinite(f64),

    /// Negative input
    #[error("AQI must not be negative, got {0}")]
    Negative(f64),

    /// Input text is not a number at all
    #[error("AQI must be numeric, got {0:?}")]
    NotANumber(String),
}

/// A finite, non-negative Air Quality Index value
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Aqi(f64);

impl Aqi {
    /// Create a validated AQI
    ///
    /// # Errors
    ///
    /// Returns `InvalidAqi` for NaN, infinite or negative input. Values are
    /// never clamped.
    pub fn new(value: f64) -> Result<Self, InvalidAqi> {
        if !value.is_finite() {
            return Err(InvalidAqi::NotFinite(value));
        }
        if value < 0.0 {
            return Err(InvalidAqi::Negative(value));
        }
        Ok(Self(value))
    }

    /// Get the raw value
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whole AQI used to look up stored ranges
    ///
    /// Bands are upper-inclusive, so a value in `(n, n + 1]` keys as `n + 1`
    /// and always lands in the record for its own band.
    #[must_use]
    pub fn lookup_key(self) -> Self {
        Self(self.0.ceil())
    }

    /// Severity band this value falls into
    #[must_use]
    pub fn band(self) -> AqiBand {
        AqiBand::from_aqi(self)
    }
}

impl fmt::Display for Aqi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}

impl TryFrom<f64> for Aqi {
    type Error = InvalidAqi;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Aqi> for f64 {
    fn from(aqi: Aqi) -> Self {
        aqi.0
    }
}

impl FromStr for Aqi {
    type Err = InvalidAqi;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| InvalidAqi::NotANumber(s.to_string()))?;
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Aqi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
