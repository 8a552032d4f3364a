//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, openapi, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Air quality API
        .route(
            "/api/air-quality",
            get(handlers::air_quality::list_air_quality)
                .post(handlers::air_quality::refresh_air_quality),
        )
        .route(
            "/api/air-quality/{locationId}/daily",
            get(handlers::air_quality::daily_summary),
        )
        // Advisory API
        .route(
            "/api/health-recommendations",
            get(handlers::advisory::get_recommendation),
        )
        .route("/api/classify", get(handlers::advisory::classify))
        .route("/api/advice", post(handlers::advisory::advise))
        // Location API
        .route(
            "/api/locations/compare",
            get(handlers::locations::compare_locations),
        )
        // API documentation
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        // Attach state
        .with_state(state)
}
