//! Pollution adapter - Implements PollutionDataPort using integration_openweather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{PollutionDataPort, PollutionSnapshot};
use async_trait::async_trait;
use domain::value_objects::{Aqi, GeoLocation, PollutantLevels};
use integration_openweather::{
    AirPollution, AirPollutionClient, Components, OpenWeatherClient, OpenWeatherConfig,
    OpenWeatherError,
};
use tracing::{debug, instrument, warn};

/// OpenWeather reports CO in μg/m³; the dashboard uses mg/m³.
const MICROGRAMS_PER_MILLIGRAM: f64 = 1000.0;

/// Adapter for the OpenWeather air-pollution API
pub struct OpenWeatherPollutionAdapter {
    client: Arc<dyn AirPollutionClient>,
}

impl std::fmt::Debug for OpenWeatherPollutionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherPollutionAdapter")
            .field("configured", &self.client.is_configured())
            .finish()
    }
}

impl OpenWeatherPollutionAdapter {
    /// Create an adapter backed by the HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: OpenWeatherConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenWeatherClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter around any air-pollution client
    #[must_use]
    pub fn with_client(client: Arc<dyn AirPollutionClient>) -> Self {
        Self { client }
    }

    /// Map integration error to application error
    fn map_error(err: OpenWeatherError) -> ApplicationError {
        match err {
            OpenWeatherError::ConnectionFailed(e)
            | OpenWeatherError::RequestFailed(e)
            | OpenWeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            OpenWeatherError::ParseError(e) => {
                ApplicationError::ExternalService(format!("unexpected OpenWeather response: {e}"))
            },
            OpenWeatherError::InvalidCoordinates => {
                ApplicationError::Internal("coordinates rejected by OpenWeather client".into())
            },
            OpenWeatherError::MissingApiKey => ApplicationError::Configuration(
                "OpenWeather API key not configured".into(),
            ),
            OpenWeatherError::Unauthorized => ApplicationError::Configuration(
                "OpenWeather rejected the configured API key".into(),
            ),
            OpenWeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }

    fn map_components(components: &Components) -> PollutantLevels {
        PollutantLevels {
            pm25: components.pm2_5,
            pm10: components.pm10,
            o3: components.o3,
            no2: components.no2,
            so2: components.so2,
            co: components.co.map(|co| co / MICROGRAMS_PER_MILLIGRAM),
        }
    }

    fn map_pollution(pollution: &AirPollution) -> Result<PollutionSnapshot, ApplicationError> {
        let aqi = Aqi::new(pollution.scaled_aqi()).map_err(|e| {
            ApplicationError::ExternalService(format!("unusable OpenWeather index: {e}"))
        })?;

        Ok(PollutionSnapshot {
            aqi,
            pollutants: Self::map_components(&pollution.components),
            observed_at: pollution.measured_at,
        })
    }
}

#[async_trait]
impl PollutionDataPort for OpenWeatherPollutionAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    async fn current_pollution(
        &self,
        location: &GeoLocation,
    ) -> Result<PollutionSnapshot, ApplicationError> {
        let result = self
            .client
            .current(location.latitude(), location.longitude())
            .await;

        match result {
            Ok(pollution) => {
                debug!(
                    index = pollution.index,
                    aqi = pollution.scaled_aqi(),
                    "Retrieved current air pollution"
                );
                Self::map_pollution(&pollution)
            },
            Err(e) => {
                warn!(error = %e, "Failed to get current air pollution");
                Err(Self::map_error(e))
            },
        }
    }

    async fn is_available(&self) -> bool {
        self.client.is_configured()
    }
}
