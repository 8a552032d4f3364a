//! API error handling
//!
//! Maps application errors onto HTTP status codes and a JSON body of the
//! form `{error, code, details?}`. Internal details are only included when
//! the server is configured to expose them.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use utoipa::ToSchema;

/// Whether internal error details go into responses
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

const GENERIC_MESSAGE: &str = "An error occurred processing your request";

/// Configure whether internal error details are included in responses
///
/// Set once at startup from `server.expose_internal_errors`.
pub fn set_expose_internal_errors(expose: bool) {
    EXPOSE_INTERNAL_ERRORS.store(expose, Ordering::SeqCst);
}

fn should_expose_details() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::SeqCst)
}

/// Replace messages that look like they carry paths, connection strings or
/// panic output with a generic text
fn sanitize_error_message(msg: &str, expose: bool) -> String {
    if expose {
        return msg.to_string();
    }

    let sensitive_patterns = [
        "/home/",
        "/users/",
        "/var/",
        "/etc/",
        "c:\\",
        "sqlite",
        "database",
        "panicked at",
        "stack backtrace",
        ".rs:",
        "connection refused",
        "://",
    ];

    let lower = msg.to_lowercase();
    if sensitive_patterns.iter().any(|p| lower.contains(p)) {
        return GENERIC_MESSAGE.to_string();
    }

    msg.to_string()
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid AQI: {0}")]
    InvalidAqi(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No recommendation: {0}")]
    RecommendationNotFound(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "No health recommendation covers AQI 612",
    "code": "recommendation_not_found"
}))]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidAqi(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::RecommendationNotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code for clients
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidAqi(_) => "invalid_aqi",
            Self::NotFound(_) => "not_found",
            Self::RecommendationNotFound(_) => "recommendation_not_found",
            Self::RateLimited => "rate_limited",
            Self::ServiceUnavailable(_) => "service_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }

    fn body(&self, expose: bool) -> ErrorResponse {
        let (message, details) = match self {
            Self::BadRequest(msg)
            | Self::InvalidAqi(msg)
            | Self::NotFound(msg)
            | Self::RecommendationNotFound(msg) => (sanitize_error_message(msg, expose), None),
            Self::RateLimited => ("Rate limit exceeded".to_string(), None),
            Self::ServiceUnavailable(msg) => {
                let message = if expose {
                    msg.clone()
                } else {
                    "Service temporarily unavailable".to_string()
                };
                (message, None)
            },
            Self::Internal(msg) => (
                "An internal error occurred".to_string(),
                expose.then(|| msg.clone()),
            ),
        };

        ErrorResponse {
            error: message,
            code: self.code().to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal(_)) {
            tracing::error!(error = %self, "Request failed");
        }
        let body = self.body(should_expose_details());
        (self.status(), Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidAqi(e) => Self::InvalidAqi(e.to_string()),
            e @ DomainError::RecommendationNotFound { .. } => {
                Self::RecommendationNotFound(e.to_string())
            },
            e @ DomainError::NotFound { .. } => Self::NotFound(e.to_string()),
            e @ (DomainError::InvalidRecommendationTable(_)
            | DomainError::InvalidAlertThresholds(_)) => Self::Internal(e.to_string()),
            e => Self::BadRequest(e.to_string()),
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => e.into(),
            ApplicationError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            ApplicationError::RateLimited => Self::RateLimited,
            ApplicationError::ExternalService(msg) => Self::ServiceUnavailable(msg),
            ApplicationError::Configuration(msg) | ApplicationError::Internal(msg) => {
                Self::Internal(msg)
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use domain::value_objects::InvalidAqi;

    use super::*;

    #[test]
    fn error_response_skips_missing_details() {
        let resp = ErrorResponse {
            error: "Bad request".to_string(),
            code: "bad_request".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("code"));
        assert!(!json.contains("details"));
    }

    #[test]
    fn recommendation_not_found_is_404_with_code() {
        let err: ApiError = ApplicationError::from(DomainError::RecommendationNotFound {
            aqi: 612.0,
        })
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "recommendation_not_found");
    }

    #[test]
    fn invalid_aqi_is_400() {
        let err: ApiError = DomainError::InvalidAqi(InvalidAqi::Negative(-3.0)).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "invalid_aqi");
    }

    #[test]
    fn unknown_location_is_404() {
        let err: ApiError = ApplicationError::NotFound("Location 9".into()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body(false).error, "Location 9 not found");
    }

    #[test]
    fn upstream_errors_map_to_503_and_429() {
        let outage: ApiError = ApplicationError::ExternalService("HTTP 502".into()).into();
        assert_eq!(outage.status(), StatusCode::SERVICE_UNAVAILABLE);

        let limited: ApiError = ApplicationError::RateLimited.into();
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn configuration_errors_are_internal() {
        let err: ApiError =
            ApplicationError::Configuration("pollution data source is not configured".into())
                .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn broken_table_is_internal() {
        let err: ApiError =
            DomainError::InvalidRecommendationTable("gap between 50 and 60".into()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn internal_details_hidden_unless_exposed() {
        let err = ApiError::Internal("disk I/O error".to_string());

        let hidden = err.body(false);
        assert_eq!(hidden.error, "An internal error occurred");
        assert!(hidden.details.is_none());

        let exposed = err.body(true);
        assert_eq!(exposed.details.as_deref(), Some("disk I/O error"));
    }

    #[test]
    fn upstream_message_hidden_unless_exposed() {
        let err = ApiError::ServiceUnavailable("HTTP 503 from upstream".to_string());
        assert_eq!(err.body(false).error, "Service temporarily unavailable");
        assert_eq!(err.body(true).error, "HTTP 503 from upstream");
    }

    #[test]
    fn sanitize_hides_paths_and_connection_strings() {
        assert_eq!(
            sanitize_error_message("cannot open /var/lib/airwatch.db", false),
            GENERIC_MESSAGE
        );
        assert_eq!(
            sanitize_error_message("connect to https://api.example.com failed", false),
            GENERIC_MESSAGE
        );
        assert_eq!(
            sanitize_error_message("thread 'main' panicked at src/main.rs:4", false),
            GENERIC_MESSAGE
        );
    }

    #[test]
    fn sanitize_keeps_safe_messages() {
        let msg = "AQI must not be negative, got -3";
        assert_eq!(sanitize_error_message(msg, false), msg);
        let path = "cannot open /var/lib/airwatch.db";
        assert_eq!(sanitize_error_message(path, true), path);
    }

    #[test]
    fn into_response_uses_status() {
        let response = ApiError::RecommendationNotFound("none".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
