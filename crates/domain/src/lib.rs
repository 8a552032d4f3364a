//! Domain layer for AirWatch
//!
//! AQI classification, pollutant risk checks, recommendation lookup and the
//! entities they operate on. Pure code: no I/O, no clocks except where a
//! caller asks for "now".

pub mod advisory;
pub mod alerts;
pub mod analytics;
pub mod classifier;
pub mod entities;
pub mod errors;
pub mod recommendation_table;
pub mod value_objects;

pub use advisory::{Activity, ActivityGuidance, HealthAdvisory, HealthImpact, activity_guidance};
pub use alerts::{AlertLevel, AlertThresholds, AqiAlert, evaluate_alert};
pub use analytics::{
    ComparisonStats, DailySummary, LocationComparison, LocationSnapshot, RankedLocation,
    compare_locations, daily_summaries,
};
pub use classifier::{
    Classification, PollutantRisk, classify, classify_lenient, pollutant_risks, risk_flags,
};
pub use entities::*;
pub use errors::DomainError;
pub use recommendation_table::{IssueSeverity, RecommendationTable, TilingIssue};
pub use value_objects::*;
