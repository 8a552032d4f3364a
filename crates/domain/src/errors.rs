//! Domain-level errors

use thiserror::Error;

use crate::value_objects::{InvalidAqi, InvalidCoordinates};

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// AQI is negative, non-numeric or non-finite
    #[error("Invalid AQI: {0}")]
    InvalidAqi(#[from] InvalidAqi),

    /// No recommendation range contains the value
    #[error("No health recommendation covers AQI {aqi}")]
    RecommendationNotFound { aqi: f64 },

    /// Coordinates out of range
    #[error(transparent)]
    InvalidCoordinates(#[from] InvalidCoordinates),

    /// Recommendation ranges do not tile the AQI scale
    #[error("Invalid recommendation table: {0}")]
    InvalidRecommendationTable(String),

    /// Alert thresholds are not strictly increasing
    #[error("Invalid alert thresholds: {0}")]
    InvalidAlertThresholds(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }
}
