//! Response and request bodies shared by several handlers
//!
//! Domain types stay free of OpenAPI derives; these mirror them for the wire.

use chrono::SecondsFormat;
use domain::{
    AirQualityReading, AqiAlert, Classification, HealthRecommendation, Location, Pollutant,
    PollutantLevels,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Band of an AQI value, or the explicit unknown band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "category": "Moderate",
    "color_token": "aqi-moderate",
    "severity_rank": 1
}))]
pub struct ClassificationResponse {
    /// Category label, "Unknown" when the value could not be classified
    pub category: String,
    /// Display colour token
    pub color_token: String,
    /// 0 (Good) to 5 (Hazardous), null when unknown
    pub severity_rank: Option<u8>,
}

impl From<Classification> for ClassificationResponse {
    fn from(classification: Classification) -> Self {
        Self {
            category: classification.category().to_string(),
            color_token: classification.color_token().to_string(),
            severity_rank: classification.severity_rank(),
        }
    }
}

/// Pollutant concentrations; missing values count as zero for risk checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct PollutantsBody {
    /// PM2.5 in μg/m³
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub pm25: Option<f64>,
    /// PM10 in μg/m³
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub pm10: Option<f64>,
    /// Ozone in μg/m³
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub o3: Option<f64>,
    /// Nitrogen dioxide in μg/m³
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub no2: Option<f64>,
    /// Sulphur dioxide in μg/m³
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub so2: Option<f64>,
    /// Carbon monoxide in mg/m³
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub co: Option<f64>,
}

impl From<PollutantsBody> for PollutantLevels {
    fn from(body: PollutantsBody) -> Self {
        Self {
            pm25: body.pm25,
            pm10: body.pm10,
            o3: body.o3,
            no2: body.no2,
            so2: body.so2,
            co: body.co,
        }
    }
}

/// A stored reading with its classification and flagged pollutants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": 42,
    "location_id": 3,
    "aqi": 87.0,
    "pm25": 31.2,
    "pm10": 64.0,
    "o3": 70.5,
    "no2": 18.0,
    "so2": 4.1,
    "co": 0.45,
    "timestamp": "2026-03-10T06:00:00.000Z",
    "classification": {"category": "Moderate", "color_token": "aqi-moderate", "severity_rank": 1},
    "risk_flags": []
}))]
pub struct ReadingResponse {
    /// Row identifier
    pub id: i64,
    /// Location the reading belongs to
    pub location_id: i64,
    /// AQI as stored
    pub aqi: f64,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
    /// Capture time, RFC 3339 UTC
    pub timestamp: String,
    /// Band of the stored AQI
    pub classification: ClassificationResponse,
    /// Pollutants above their cutoff
    #[schema(value_type = Vec<String>, example = json!(["pm25"]))]
    pub risk_flags: Vec<Pollutant>,
}

impl From<&AirQualityReading> for ReadingResponse {
    fn from(reading: &AirQualityReading) -> Self {
        let levels = &reading.pollutants;
        Self {
            id: reading.id,
            location_id: reading.location_id.as_i64(),
            aqi: reading.aqi,
            pm25: levels.pm25,
            pm10: levels.pm10,
            o3: levels.o3,
            no2: levels.no2,
            so2: levels.so2,
            co: levels.co,
            timestamp: reading
                .recorded_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            classification: reading.classification().into(),
            risk_flags: reading.risk_flags().into_iter().collect(),
        }
    }
}

/// A location and its most recent reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationResponse {
    /// Location identifier
    pub id: i64,
    /// Display name
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Latest reading, null if none was ever stored
    pub latest: Option<ReadingResponse>,
}

impl LocationResponse {
    /// Build from a location and its optional latest reading
    #[must_use]
    pub fn new(location: &Location, latest: Option<&AirQualityReading>) -> Self {
        Self {
            id: location.id.as_i64(),
            name: location.name.clone(),
            latitude: location.coordinates.latitude(),
            longitude: location.coordinates.longitude(),
            latest: latest.map(ReadingResponse::from),
        }
    }
}

/// A stored health recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "aqi_min": 51,
    "aqi_max": 100,
    "message": "Air quality is acceptable.",
    "activity_guidance": "Unusually sensitive people should consider limiting prolonged outdoor exertion."
}))]
pub struct RecommendationResponse {
    /// Inclusive lower bound
    pub aqi_min: u32,
    /// Inclusive upper bound, null for an open-ended top range
    pub aqi_max: Option<u32>,
    /// Main recommendation text
    pub message: String,
    /// Guidance on outdoor activities
    pub activity_guidance: String,
}

impl From<&HealthRecommendation> for RecommendationResponse {
    fn from(record: &HealthRecommendation) -> Self {
        Self {
            aqi_min: record.aqi_min,
            aqi_max: record.aqi_max,
            message: record.message.clone(),
            activity_guidance: record.activity_guidance.clone(),
        }
    }
}

/// An alert raised for an AQI value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AlertResponse {
    /// `info`, `warning` or `danger`
    pub level: String,
    pub title: String,
    pub message: String,
}

impl From<&AqiAlert> for AlertResponse {
    fn from(alert: &AqiAlert) -> Self {
        Self {
            level: alert.level.as_str().to_string(),
            title: alert.title.to_string(),
            message: alert.message.to_string(),
        }
    }
}
