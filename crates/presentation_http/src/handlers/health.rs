//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"status": "ok", "version": "0.3.0"}))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Database probe result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatabaseStatus {
    pub reachable: bool,
    pub version: Option<String>,
    pub response_time_ms: Option<u64>,
}

/// Recommendation table loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationTableStatus {
    /// Number of records
    pub records: usize,
    /// Tiling warnings and errors found at load time
    pub issues: Vec<String>,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// Database reachable and upstream configured
    pub ready: bool,
    pub database: DatabaseStatus,
    /// Whether refreshes can reach the upstream pollution API
    pub upstream_configured: bool,
    pub recommendations: RecommendationTableStatus,
}

/// Readiness check - can the server serve every endpoint?
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Ready", body = ReadinessResponse),
        (status = 503, description = "Database unreachable or upstream not configured", body = ReadinessResponse)
    )
)]
#[instrument(skip(state))]
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.database.check_health().await {
        Ok(health) => DatabaseStatus {
            reachable: health.reachable,
            version: health.version,
            response_time_ms: health.response_time_ms,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            DatabaseStatus {
                reachable: false,
                version: None,
                response_time_ms: None,
            }
        },
    };
    let upstream_configured = state.air_quality.pollution_source_available().await;

    let ready = database.reachable && upstream_configured;
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            database,
            upstream_configured,
            recommendations: RecommendationTableStatus {
                records: state.advisory.table().len(),
                issues: state
                    .advisory
                    .tiling_issues()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            },
        }),
    )
}
