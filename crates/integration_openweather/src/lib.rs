//! OpenWeather air pollution integration
//!
//! Client for the OpenWeather Air Pollution API
//! (<https://openweathermap.org/api/air-pollution>). Requires an API key.

pub mod client;
mod models;

pub use client::{AirPollutionClient, OpenWeatherClient, OpenWeatherConfig, OpenWeatherError};
pub use models::{AirPollution, Components};
