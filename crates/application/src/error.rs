//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A referenced resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ExternalService(_))
    }

    /// Check if this error means "no such thing"
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Domain(
                    DomainError::NotFound { .. } | DomainError::RecommendationNotFound { .. }
                )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_converts() {
        let err: ApplicationError = DomainError::RecommendationNotFound { aqi: 600.0 }.into();
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert_eq!(err.to_string(), "No health recommendation covers AQI 600");
    }

    #[test]
    fn retryable_errors() {
        assert!(ApplicationError::RateLimited.is_retryable());
        assert!(ApplicationError::ExternalService("down".into()).is_retryable());
        assert!(!ApplicationError::Internal("bug".into()).is_retryable());
        assert!(!ApplicationError::NotFound("Location 3".into()).is_retryable());
    }

    #[test]
    fn not_found_errors() {
        assert!(ApplicationError::NotFound("Location 3".into()).is_not_found());
        assert!(ApplicationError::from(DomainError::not_found("Location", 3)).is_not_found());
        assert!(!ApplicationError::RateLimited.is_not_found());
    }

    #[test]
    fn not_found_message() {
        let err = ApplicationError::NotFound("Location 9".into());
        assert_eq!(err.to_string(), "Location 9 not found");
    }
}
