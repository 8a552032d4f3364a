//! Value Objects - Immutable, identity-less domain primitives

mod aqi;
mod aqi_band;
mod geo_location;
mod location_id;
mod pollutant;

pub use aqi::{Aqi, InvalidAqi};
pub use aqi_band::{AqiBand, BAND_UPPER_BOUNDS};
pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use location_id::LocationId;
pub use pollutant::{HIGH_THRESHOLDS, Pollutant, PollutantLevels, RiskLevel};
