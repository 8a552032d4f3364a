//! Air quality handlers
//!
//! Location listing, reading history, refresh from upstream and daily
//! summaries.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use domain::{DailySummary, LocationId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::dto::{LocationResponse, ReadingResponse};
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Query for `GET /api/air-quality`
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AirQualityQuery {
    /// Return this location's history instead of the location list
    #[serde(rename = "locationId")]
    pub location_id: Option<i64>,
    /// History length (default: 24, max: 720)
    pub limit: Option<u32>,
}

/// Refresh request body
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({"locationId": 3}))]
pub struct RefreshRequest {
    /// Location to refresh
    #[serde(rename = "locationId")]
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub location_id: i64,
}

/// Refresh result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub success: bool,
    /// The stored reading
    pub data: ReadingResponse,
}

/// Query for the daily summary
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DailySummaryQuery {
    /// Number of days ending today (default: 7, max: 90)
    pub days: Option<u32>,
}

/// Statistics for one UTC day
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"date": "2026-03-10", "average": 87, "min": 62.0, "max": 118.0, "readings": 12}))]
pub struct DailySummaryEntry {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,
    /// Mean AQI, rounded
    pub average: u32,
    pub min: f64,
    pub max: f64,
    /// Number of readings that day
    pub readings: usize,
}

impl From<&DailySummary> for DailySummaryEntry {
    fn from(summary: &DailySummary) -> Self {
        Self {
            date: summary.date.format("%Y-%m-%d").to_string(),
            average: summary.average,
            min: summary.min,
            max: summary.max,
            readings: summary.readings,
        }
    }
}

/// Daily summary response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailySummaryResponse {
    pub location_id: i64,
    /// Window actually used after clamping
    pub days: u32,
    /// Days with readings, oldest first
    pub summaries: Vec<DailySummaryEntry>,
}

/// List locations with their latest reading, or one location's history
///
/// GET /api/air-quality
#[utoipa::path(
    get,
    path = "/api/air-quality",
    tag = "air-quality",
    params(AirQualityQuery),
    responses(
        (status = 200, description = "Locations with latest reading (no locationId) or readings newest first (with locationId)", body = Vec<LocationResponse>),
        (status = 404, description = "Unknown location", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_air_quality(
    State(state): State<AppState>,
    Query(query): Query<AirQualityQuery>,
) -> Result<Response, ApiError> {
    if let Some(id) = query.location_id {
        let readings = state
            .air_quality
            .history(LocationId::new(id), query.limit)
            .await?;
        debug!(location_id = id, count = readings.len(), "Served history");
        let body: Vec<ReadingResponse> = readings.iter().map(ReadingResponse::from).collect();
        return Ok(Json(body).into_response());
    }

    let snapshots = state.air_quality.list_locations_with_latest().await?;
    let body: Vec<LocationResponse> = snapshots
        .iter()
        .map(|s| LocationResponse::new(&s.location, s.latest.as_ref()))
        .collect();
    Ok(Json(body).into_response())
}

/// Fetch current pollution for a location and store it
///
/// POST /api/air-quality
#[utoipa::path(
    post,
    path = "/api/air-quality",
    tag = "air-quality",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Reading stored", body = RefreshResponse),
        (status = 400, description = "Invalid body", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown location", body = crate::error::ErrorResponse),
        (status = 429, description = "Upstream rate limit", body = crate::error::ErrorResponse),
        (status = 503, description = "Upstream unavailable", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(location_id = request.location_id))]
pub async fn refresh_air_quality(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let stored = state
        .air_quality
        .refresh(LocationId::new(request.location_id))
        .await?;

    info!(reading_id = stored.id, aqi = stored.aqi, "Refreshed location");
    Ok(Json(RefreshResponse {
        success: true,
        data: ReadingResponse::from(&stored),
    }))
}

/// Per-day AQI statistics for a location
///
/// GET /api/air-quality/{locationId}/daily
#[utoipa::path(
    get,
    path = "/api/air-quality/{locationId}/daily",
    tag = "air-quality",
    params(
        ("locationId" = i64, Path, description = "Location identifier"),
        DailySummaryQuery
    ),
    responses(
        (status = 200, description = "Daily statistics, oldest day first", body = DailySummaryResponse),
        (status = 404, description = "Unknown location", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    Path(location_id): Path<i64>,
    Query(query): Query<DailySummaryQuery>,
) -> Result<Json<DailySummaryResponse>, ApiError> {
    let days = state.air_quality.config().summary_days(query.days);
    let summaries = state
        .air_quality
        .daily_summary(LocationId::new(location_id), Some(days))
        .await?;

    Ok(Json(DailySummaryResponse {
        location_id,
        days,
        summaries: summaries.iter().map(DailySummaryEntry::from).collect(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn refresh_request_uses_camel_case_id() {
        let request: RefreshRequest = serde_json::from_str(r#"{"locationId": 2}"#).unwrap();
        assert_eq!(request.location_id, 2);
        assert!(request.validate().is_ok());

        let request: RefreshRequest = serde_json::from_str(r#"{"locationId": 0}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn summary_entry_formats_date() {
        let entry = DailySummaryEntry::from(&DailySummary {
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            average: 74,
            min: 40.0,
            max: 120.0,
            readings: 5,
        });
        assert_eq!(entry.date, "2026-03-09");
        assert_eq!(entry.average, 74);
    }
}
