//! OpenWeather air-pollution configuration.

use integration_openweather::OpenWeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// OpenWeather air-pollution API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenWeatherAppConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (sensitive - uses `SecretString`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for OpenWeatherAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherAppConfig")
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

impl Default for OpenWeatherAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl OpenWeatherAppConfig {
    /// Whether a non-blank API key is set
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Convert to the client's configuration
    ///
    /// A blank key is passed on as missing.
    #[must_use]
    pub fn to_client_config(&self) -> OpenWeatherConfig {
        OpenWeatherConfig {
            base_url: self.base_url.clone(),
            api_key: if self.has_api_key() {
                self.api_key.clone()
            } else {
                None
            },
            timeout_secs: self.timeout_secs,
        }
    }
}
