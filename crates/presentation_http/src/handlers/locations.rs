//! Location comparison handler

use axum::{Json, extract::State};
use domain::{LocationComparison, RankedLocation};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use super::dto::ClassificationResponse;
use crate::{error::ApiError, state::AppState};

/// One ranked location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankedLocationResponse {
    /// 1 is the cleanest
    pub rank: usize,
    pub location_id: i64,
    pub name: String,
    /// Latest AQI
    pub aqi: f64,
    pub classification: ClassificationResponse,
}

impl From<&RankedLocation> for RankedLocationResponse {
    fn from(ranked: &RankedLocation) -> Self {
        Self {
            rank: ranked.rank,
            location_id: ranked.location_id.as_i64(),
            name: ranked.name.clone(),
            aqi: ranked.aqi,
            classification: domain::Classification::from(ranked.band).into(),
        }
    }
}

/// A location without a usable reading
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnrankedLocationResponse {
    pub location_id: i64,
    pub name: String,
}

/// Spread of the latest AQI across ranked locations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComparisonStatsResponse {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub spread: f64,
}

/// Locations ranked by latest AQI
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "ranking": [
        {"rank": 1, "location_id": 3, "name": "Koramangala", "aqi": 45.0,
         "classification": {"category": "Good", "color_token": "aqi-good", "severity_rank": 0}},
        {"rank": 2, "location_id": 1, "name": "Whitefield", "aqi": 210.0,
         "classification": {"category": "Very Unhealthy", "color_token": "aqi-very-unhealthy", "severity_rank": 4}}
    ],
    "unranked": [],
    "stats": {"min": 45.0, "max": 210.0, "average": 127.5, "spread": 165.0},
    "insight": "Major air quality difference: Whitefield has significantly worse air quality than Koramangala (165 AQI points difference)"
}))]
pub struct ComparisonResponse {
    /// Cleanest first
    pub ranking: Vec<RankedLocationResponse>,
    /// Locations without a usable reading
    pub unranked: Vec<UnrankedLocationResponse>,
    /// Present when at least one location is ranked
    pub stats: Option<ComparisonStatsResponse>,
    /// Present when at least two locations are ranked
    pub insight: Option<String>,
}

impl From<&LocationComparison> for ComparisonResponse {
    fn from(comparison: &LocationComparison) -> Self {
        Self {
            ranking: comparison
                .ranking
                .iter()
                .map(RankedLocationResponse::from)
                .collect(),
            unranked: comparison
                .unranked
                .iter()
                .map(|l| UnrankedLocationResponse {
                    location_id: l.id.as_i64(),
                    name: l.name.clone(),
                })
                .collect(),
            stats: comparison.stats.map(|s| ComparisonStatsResponse {
                min: s.min,
                max: s.max,
                average: s.average,
                spread: s.spread,
            }),
            insight: comparison.insight.clone(),
        }
    }
}

/// Rank all locations by their latest AQI
///
/// GET /api/locations/compare
#[utoipa::path(
    get,
    path = "/api/locations/compare",
    tag = "locations",
    responses(
        (status = 200, description = "Ranking, spread and insight", body = ComparisonResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn compare_locations(
    State(state): State<AppState>,
) -> Result<Json<ComparisonResponse>, ApiError> {
    let comparison = state.air_quality.compare_locations().await?;
    Ok(Json(ComparisonResponse::from(&comparison)))
}
