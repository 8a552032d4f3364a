//! OpenAPI documentation module
//!
//! Serves the OpenAPI 3 document for the AirWatch HTTP API as JSON.

// Allow clippy warnings from macro-generated code in utoipa derive
#![allow(clippy::needless_for_each)]

use axum::Json;
use utoipa::OpenApi;

use crate::handlers;

/// OpenAPI documentation for AirWatch
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AirWatch API",
        version = "0.1.0",
        description = "Air quality monitoring: AQI readings, health recommendations and location comparison",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    tags(
        (name = "health", description = "Liveness and readiness endpoints"),
        (name = "air-quality", description = "Locations, readings, refresh and daily summaries"),
        (name = "advisory", description = "AQI classification, recommendations and advice"),
        (name = "locations", description = "Location comparison")
    ),
    paths(
        // Health endpoints
        handlers::health::health_check,
        handlers::health::readiness_check,
        // Air quality endpoints
        handlers::air_quality::list_air_quality,
        handlers::air_quality::refresh_air_quality,
        handlers::air_quality::daily_summary,
        // Advisory endpoints
        handlers::advisory::get_recommendation,
        handlers::advisory::classify,
        handlers::advisory::advise,
        // Location endpoints
        handlers::locations::compare_locations,
    ),
    components(
        schemas(
            // Health schemas
            handlers::health::HealthResponse,
            handlers::health::ReadinessResponse,
            handlers::health::DatabaseStatus,
            handlers::health::RecommendationTableStatus,
            // Shared schemas
            handlers::dto::ClassificationResponse,
            handlers::dto::PollutantsBody,
            handlers::dto::ReadingResponse,
            handlers::dto::LocationResponse,
            handlers::dto::RecommendationResponse,
            handlers::dto::AlertResponse,
            // Air quality schemas
            handlers::air_quality::AirQualityQuery,
            handlers::air_quality::RefreshRequest,
            handlers::air_quality::RefreshResponse,
            handlers::air_quality::DailySummaryQuery,
            handlers::air_quality::DailySummaryEntry,
            handlers::air_quality::DailySummaryResponse,
            // Advisory schemas
            handlers::advisory::RecommendationQuery,
            handlers::advisory::ClassifyQuery,
            handlers::advisory::ClassifyResponse,
            handlers::advisory::AdviceRequest,
            handlers::advisory::ActivityResponse,
            handlers::advisory::PollutantRiskResponse,
            handlers::advisory::AdvisoryResponse,
            // Location schemas
            handlers::locations::RankedLocationResponse,
            handlers::locations::UnrankedLocationResponse,
            handlers::locations::ComparisonStatsResponse,
            handlers::locations::ComparisonResponse,
            // Error schemas
            crate::error::ErrorResponse,
        )
    )
)]
#[derive(Debug)]
pub struct ApiDoc;

/// The OpenAPI document
///
/// GET /api-docs/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
