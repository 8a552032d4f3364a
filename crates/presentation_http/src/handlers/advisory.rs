//! Classification, recommendation and advisory handlers
//!
//! These never touch storage: the recommendation table is loaded once at
//! startup and held by `HealthAdvisoryService`.

use axum::{
    Json,
    extract::{Query, State},
};
use domain::{Aqi, Classification, HealthAdvisory, Pollutant, PollutantLevels, PollutantRisk};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::dto::{AlertResponse, ClassificationResponse, PollutantsBody, RecommendationResponse};
use crate::{error::ApiError, middleware::ValidatedJson, state::AppState};

/// Parse the `aqi` query parameter, rejecting missing or invalid values
fn parse_aqi(raw: Option<&str>) -> Result<Aqi, ApiError> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("AQI parameter required".to_string()))?;
    raw.parse::<Aqi>()
        .map_err(|e| ApiError::InvalidAqi(e.to_string()))
}

/// Query for `GET /api/health-recommendations`
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct RecommendationQuery {
    /// AQI value, non-negative
    pub aqi: Option<String>,
}

/// Look up the stored recommendation covering an AQI value
///
/// GET /api/health-recommendations?aqi=X
#[utoipa::path(
    get,
    path = "/api/health-recommendations",
    tag = "advisory",
    params(RecommendationQuery),
    responses(
        (status = 200, description = "Recommendation whose range contains the value", body = RecommendationResponse),
        (status = 400, description = "Missing or invalid AQI", body = crate::error::ErrorResponse),
        (status = 404, description = "No range contains the value (code recommendation_not_found)", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_recommendation(
    State(state): State<AppState>,
    Query(query): Query<RecommendationQuery>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let aqi = parse_aqi(query.aqi.as_deref())?;
    let record = state.advisory.recommendation(aqi)?;
    debug!(%aqi, aqi_min = record.aqi_min, "Resolved recommendation");
    Ok(Json(RecommendationResponse::from(record)))
}

/// Query for `GET /api/classify`
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ClassifyQuery {
    /// AQI value, non-negative
    pub aqi: Option<String>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub o3: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
}

impl ClassifyQuery {
    const fn pollutants(&self) -> PollutantLevels {
        PollutantLevels {
            pm25: self.pm25,
            pm10: self.pm10,
            o3: self.o3,
            no2: self.no2,
            so2: self.so2,
            co: self.co,
        }
    }
}

/// Classification of an AQI value plus pollutant flags
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    pub aqi: f64,
    pub classification: ClassificationResponse,
    /// Pollutants above their cutoff
    #[schema(value_type = Vec<String>)]
    pub risk_flags: Vec<Pollutant>,
    /// Alert for this value, if any
    pub alert: Option<AlertResponse>,
}

/// Classify an AQI value and check pollutant concentrations
///
/// GET /api/classify?aqi=X
#[utoipa::path(
    get,
    path = "/api/classify",
    tag = "advisory",
    params(ClassifyQuery),
    responses(
        (status = 200, description = "Band, risk flags and alert", body = ClassifyResponse),
        (status = 400, description = "Missing or invalid AQI", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn classify(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let aqi = parse_aqi(query.aqi.as_deref())?;
    let levels = query.pollutants();

    Ok(Json(ClassifyResponse {
        aqi: aqi.value(),
        classification: Classification::from(aqi.band()).into(),
        risk_flags: domain::risk_flags(&levels).into_iter().collect(),
        alert: state.advisory.alert(aqi).as_ref().map(AlertResponse::from),
    }))
}

/// Advice request body
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({"aqi": 162.0, "pollutants": {"pm25": 58.0, "o3": 170.0}}))]
pub struct AdviceRequest {
    /// AQI value, non-negative
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub aqi: f64,
    /// Optional pollutant concentrations
    #[serde(default)]
    #[validate(nested)]
    pub pollutants: PollutantsBody,
}

/// Guidance for one activity
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponse {
    /// `outdoor`, `exercise`, `windows` or `sensitive_groups`
    pub activity: String,
    pub safe: bool,
    pub message: String,
}

/// A flagged pollutant with advice
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PollutantRiskResponse {
    /// Pollutant key, e.g. `pm25`
    pub pollutant: String,
    pub value: f64,
    pub threshold: f64,
    /// Always `high`
    pub level: String,
    pub health_risk: String,
    pub action: String,
}

impl From<&PollutantRisk> for PollutantRiskResponse {
    fn from(risk: &PollutantRisk) -> Self {
        Self {
            pollutant: risk.pollutant.key().to_string(),
            value: risk.value,
            threshold: risk.threshold,
            level: "high".to_string(),
            health_risk: risk.health_risk.to_string(),
            action: risk.action.to_string(),
        }
    }
}

/// Full advisory for an AQI value
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdvisoryResponse {
    pub aqi: f64,
    pub classification: ClassificationResponse,
    /// Stored recommendation, or a generic one when `fallback` is set
    pub recommendation: RecommendationResponse,
    /// Set when no stored range covered the value
    pub fallback: bool,
    /// `Low`, `Moderate`, `High`, `Very High` or `Extreme`
    pub health_impact: String,
    pub activities: Vec<ActivityResponse>,
    pub pollutant_risks: Vec<PollutantRiskResponse>,
    pub alert: Option<AlertResponse>,
}

impl From<&HealthAdvisory> for AdvisoryResponse {
    fn from(advisory: &HealthAdvisory) -> Self {
        Self {
            aqi: advisory.aqi.value(),
            classification: Classification::from(advisory.band).into(),
            recommendation: RecommendationResponse::from(&advisory.recommendation),
            fallback: advisory.fallback,
            health_impact: advisory.health_impact.label().to_string(),
            activities: advisory
                .activities
                .iter()
                .map(|g| ActivityResponse {
                    activity: g.activity.key().to_string(),
                    safe: g.safe,
                    message: g.message.to_string(),
                })
                .collect(),
            pollutant_risks: advisory
                .pollutant_risks
                .iter()
                .map(PollutantRiskResponse::from)
                .collect(),
            alert: advisory.alert.as_ref().map(AlertResponse::from),
        }
    }
}

/// Build the full advisory for an AQI value
///
/// POST /api/advice
#[utoipa::path(
    post,
    path = "/api/advice",
    tag = "advisory",
    request_body = AdviceRequest,
    responses(
        (status = 200, description = "Advisory; falls back to generic advice when no range matches", body = AdvisoryResponse),
        (status = 400, description = "Invalid body", body = crate::error::ErrorResponse)
    )
)]
#[instrument(skip(state, request), fields(aqi = request.aqi))]
pub async fn advise(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdviceRequest>,
) -> Result<Json<AdvisoryResponse>, ApiError> {
    let aqi = Aqi::new(request.aqi).map_err(|e| ApiError::InvalidAqi(e.to_string()))?;
    let advisory = state.advisory.advise(aqi, &request.pollutants.into());
    Ok(Json(AdvisoryResponse::from(&advisory)))
}
