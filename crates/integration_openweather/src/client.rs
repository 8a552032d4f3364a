//! OpenWeather air pollution client
//!
//! HTTP client for `GET {base}/air_pollution?lat=..&lon=..&appid=..`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::{AirPollution, ApiResponse};

/// OpenWeather client errors
#[derive(Debug, Error)]
pub enum OpenWeatherError {
    /// HTTP client could not be built
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request failed or returned an unexpected status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be interpreted
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// No API key configured
    #[error("OpenWeather API key not configured")]
    MissingApiKey,

    /// API key rejected
    #[error("OpenWeather rejected the API key")]
    Unauthorized,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// OpenWeather client configuration
#[derive(Clone, Deserialize)]
pub struct OpenWeatherConfig {
    /// API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key, sent as `appid`
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenWeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Air pollution client trait
#[async_trait]
pub trait AirPollutionClient: Send + Sync {
    /// Current air pollution at a coordinate
    async fn current(&self, latitude: f64, longitude: f64)
    -> Result<AirPollution, OpenWeatherError>;

    /// Whether an API key is configured
    fn is_configured(&self) -> bool;
}

/// OpenWeather HTTP client implementation
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// A missing API key is accepted here and reported per request, so the
    /// rest of the service can run without upstream access.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenWeatherConfig) -> Result<Self, OpenWeatherError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OpenWeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), OpenWeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(OpenWeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/air_pollution",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn parse_response(response: ApiResponse) -> Result<AirPollution, OpenWeatherError> {
        let entry = response.list.into_iter().next().ok_or_else(|| {
            OpenWeatherError::ParseError("No pollution data in response".to_string())
        })?;

        if !(1..=5).contains(&entry.main.aqi) {
            return Err(OpenWeatherError::ParseError(format!(
                "Air quality index out of range: {}",
                entry.main.aqi
            )));
        }

        let measured_at = DateTime::<Utc>::from_timestamp(entry.dt, 0)
            .ok_or_else(|| OpenWeatherError::ParseError(format!("Invalid timestamp: {}", entry.dt)))?;

        Ok(AirPollution {
            index: entry.main.aqi,
            components: entry.components,
            measured_at,
        })
    }
}

#[async_trait]
impl AirPollutionClient for OpenWeatherClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirPollution, OpenWeatherError> {
        Self::validate_coordinates(latitude, longitude)?;
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(OpenWeatherError::MissingApiKey)?;

        let url = self.endpoint();
        debug!(url = %url, "Fetching current air pollution");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", api_key.expose_secret().to_string()),
            ])
            .send()
            .await
            .map_err(|e| OpenWeatherError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("OpenWeather rejected the API key");
            return Err(OpenWeatherError::Unauthorized);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenWeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(OpenWeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(OpenWeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| OpenWeatherError::ParseError(e.without_url().to_string()))?;

        Self::parse_response(api_response)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiEntry, ApiMain, Components};

    fn entry(aqi: u8, dt: i64) -> ApiEntry {
        ApiEntry {
            dt,
            main: ApiMain { aqi },
            components: Components::default(),
        }
    }

    #[test]
    fn config_defaults() {
        let config = OpenWeatherConfig::default();
        assert_eq!(config.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = OpenWeatherConfig {
            api_key: Some(SecretString::from("super-secret")),
            ..OpenWeatherConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn validate_coordinates() {
        assert!(OpenWeatherClient::validate_coordinates(12.97, 77.59).is_ok());
        assert!(OpenWeatherClient::validate_coordinates(91.0, 0.0).is_err());
        assert!(OpenWeatherClient::validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = OpenWeatherClient::new(OpenWeatherConfig {
            base_url: "http://localhost:9999/data/2.5/".to_string(),
            ..OpenWeatherConfig::default()
        })
        .unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9999/data/2.5/air_pollution");
    }

    #[test]
    fn parse_takes_first_entry() {
        let response = ApiResponse {
            list: vec![entry(4, 1_700_000_000), entry(1, 1_700_003_600)],
        };
        let pollution = OpenWeatherClient::parse_response(response).unwrap();
        assert_eq!(pollution.index, 4);
        assert_eq!(pollution.measured_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn parse_rejects_empty_list() {
        let result = OpenWeatherClient::parse_response(ApiResponse { list: vec![] });
        assert!(matches!(result, Err(OpenWeatherError::ParseError(_))));
    }

    #[test]
    fn parse_rejects_out_of_range_index() {
        let result = OpenWeatherClient::parse_response(ApiResponse {
            list: vec![entry(0, 1_700_000_000)],
        });
        assert!(matches!(result, Err(OpenWeatherError::ParseError(_))));
    }

    #[test]
    fn is_configured_reflects_api_key() {
        let client = OpenWeatherClient::new(OpenWeatherConfig::default()).unwrap();
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_request() {
        let client = OpenWeatherClient::new(OpenWeatherConfig::default()).unwrap();
        let result = client.current(12.97, 77.59).await;
        assert!(matches!(result, Err(OpenWeatherError::MissingApiKey)));
    }
}
