//! OpenWeather air pollution models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Multiplier from OpenWeather's 1-5 index to the 0-250 dashboard scale
pub const INDEX_SCALE: f64 = 50.0;

/// Raw API response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    pub list: Vec<ApiEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiEntry {
    pub dt: i64,
    pub main: ApiMain,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub aqi: u8,
}

/// Component concentrations in μg/m³
///
/// Every field is optional; the API omits components it has no data for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Carbon monoxide
    #[serde(default)]
    pub co: Option<f64>,
    /// Nitrogen monoxide
    #[serde(default)]
    pub no: Option<f64>,
    /// Nitrogen dioxide
    #[serde(default)]
    pub no2: Option<f64>,
    /// Ozone
    #[serde(default)]
    pub o3: Option<f64>,
    /// Sulphur dioxide
    #[serde(default)]
    pub so2: Option<f64>,
    /// Fine particles
    #[serde(default)]
    pub pm2_5: Option<f64>,
    /// Coarse particles
    #[serde(default)]
    pub pm10: Option<f64>,
    /// Ammonia
    #[serde(default)]
    pub nh3: Option<f64>,
}

/// Current air pollution at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirPollution {
    /// OpenWeather air quality index, 1 (good) to 5 (very poor)
    pub index: u8,
    /// Component concentrations
    pub components: Components,
    /// Measurement time
    pub measured_at: DateTime<Utc>,
}

impl AirPollution {
    /// Index converted to the dashboard's AQI scale
    #[must_use]
    pub fn scaled_aqi(&self) -> f64 {
        f64::from(self.index) * INDEX_SCALE
    }
}
