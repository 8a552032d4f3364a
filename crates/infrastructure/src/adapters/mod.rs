//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod pollution_adapter;

pub use pollution_adapter::OpenWeatherPollutionAdapter;
