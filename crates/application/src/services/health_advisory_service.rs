//! Health advisory service
//!
//! Holds the recommendation table loaded at startup and answers
//! recommendation, alert and advisory queries against it.

use std::sync::Arc;

use domain::{
    AlertThresholds, AqiAlert, HealthAdvisory, HealthRecommendation, IssueSeverity,
    RecommendationTable, TilingIssue, evaluate_alert,
    value_objects::{Aqi, PollutantLevels},
};
use tracing::{info, instrument, warn};

use crate::{error::ApplicationError, ports::RecommendationStore};

/// Read-only advisory engine over a validated recommendation table
#[derive(Debug, Clone)]
pub struct HealthAdvisoryService {
    table: Arc<RecommendationTable>,
    thresholds: AlertThresholds,
    issues: Arc<Vec<TilingIssue>>,
}

impl HealthAdvisoryService {
    /// Wrap an already loaded table
    ///
    /// With `strict_tiling`, tiling errors are returned; otherwise they are
    /// logged and kept for reporting.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid alert thresholds, or for tiling errors
    /// when `strict_tiling` is set.
    pub fn new(
        table: RecommendationTable,
        thresholds: AlertThresholds,
        strict_tiling: bool,
    ) -> Result<Self, ApplicationError> {
        thresholds.validate()?;

        let issues = table.tiling_issues();
        for issue in &issues {
            match issue.severity() {
                IssueSeverity::Warning => warn!(%issue, "Recommendation table warning"),
                IssueSeverity::Error => warn!(%issue, "Recommendation table error"),
            }
        }
        if strict_tiling {
            table.validate()?;
        }

        Ok(Self {
            table: Arc::new(table),
            thresholds,
            issues: Arc::new(issues),
        })
    }

    /// Load the table from storage and validate it
    ///
    /// # Errors
    ///
    /// Returns storage errors, or the validation errors of [`Self::new`].
    #[instrument(skip(store))]
    pub async fn load(
        store: &dyn RecommendationStore,
        thresholds: AlertThresholds,
        strict_tiling: bool,
    ) -> Result<Self, ApplicationError> {
        let table = store.load_table().await?;
        info!(records = table.len(), "Loaded recommendation table");
        Self::new(table, thresholds, strict_tiling)
    }

    /// The loaded table
    #[must_use]
    pub fn table(&self) -> &RecommendationTable {
        &self.table
    }

    /// Tiling issues found at load time
    #[must_use]
    pub fn tiling_issues(&self) -> &[TilingIssue] {
        &self.issues
    }

    /// Alert thresholds in use
    #[must_use]
    pub const fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Stored recommendation for a value, rounded up to a whole AQI first
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RecommendationNotFound` when no range covers it.
    pub fn recommendation(&self, aqi: Aqi) -> Result<&HealthRecommendation, ApplicationError> {
        Ok(self.table.resolve(aqi.lookup_key())?)
    }

    /// Alert for a value, if any
    #[must_use]
    pub fn alert(&self, aqi: Aqi) -> Option<AqiAlert> {
        evaluate_alert(aqi, &self.thresholds)
    }

    /// Full advisory; never fails, falling back to generic advice
    #[must_use]
    pub fn advise(&self, aqi: Aqi, pollutants: &PollutantLevels) -> HealthAdvisory {
        let advisory = HealthAdvisory::build(aqi, pollutants, &self.table, &self.thresholds);
        if advisory.fallback {
            warn!(%aqi, "No stored recommendation, using fallback");
        }
        advisory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockRecommendationStore;
    use domain::{AqiBand, DomainError};

    fn aqi(v: f64) -> Aqi {
        Aqi::new(v).unwrap()
    }

    fn standard_service() -> HealthAdvisoryService {
        HealthAdvisoryService::new(
            RecommendationTable::standard(),
            AlertThresholds::default(),
            true,
        )
        .unwrap()
    }

    fn gapped_table() -> RecommendationTable {
        RecommendationTable::new(vec![
            HealthRecommendation::new(0, 50, "good", ""),
            HealthRecommendation::new(60, 100, "moderate", ""),
        ])
    }

    #[test]
    fn strict_mode_rejects_gaps() {
        let err = HealthAdvisoryService::new(gapped_table(), AlertThresholds::default(), true)
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidRecommendationTable(_))
        ));
    }

    #[test]
    fn lenient_mode_keeps_issues() {
        let service =
            HealthAdvisoryService::new(gapped_table(), AlertThresholds::default(), false).unwrap();
        assert!(
            service
                .tiling_issues()
                .contains(&TilingIssue::Gap { from: 51, to: 59 })
        );
        assert!(service.recommendation(aqi(55.0)).is_err());
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let thresholds = AlertThresholds {
            moderate: 200.0,
            unhealthy: 150.0,
            dangerous: 100.0,
        };
        assert!(
            HealthAdvisoryService::new(RecommendationTable::standard(), thresholds, true).is_err()
        );
    }

    #[test]
    fn recommendation_rounds_up_to_whole_aqi() {
        let service = standard_service();
        let rec = service.recommendation(aqi(100.0)).unwrap();
        assert_eq!(rec.aqi_min, 51);
        let rec = service.recommendation(aqi(100.2)).unwrap();
        assert_eq!(rec.aqi_min, 101);
        let rec = service.recommendation(aqi(50.5)).unwrap();
        assert_eq!(rec.aqi_min, 51);
    }

    #[test]
    fn advice_record_matches_band_just_above_boundaries() {
        let service = standard_service();
        for (value, aqi_min) in [(50.3, 51), (100.2, 101), (150.4, 151), (300.2, 301)] {
            let advisory = service.advise(aqi(value), &PollutantLevels::default());
            assert!(!advisory.fallback);
            assert_eq!(advisory.recommendation.aqi_min, aqi_min, "wrong record for {value}");
            assert_eq!(aqi(f64::from(aqi_min)).band(), advisory.band);
        }
    }

    #[test]
    fn recommendation_not_found_above_table() {
        let err = standard_service().recommendation(aqi(750.0)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn advise_falls_back_above_table() {
        let advisory = standard_service().advise(aqi(750.0), &PollutantLevels::default());
        assert!(advisory.fallback);
        assert_eq!(advisory.band, AqiBand::Hazardous);
    }

    #[test]
    fn alert_uses_thresholds() {
        let service = standard_service();
        assert!(service.alert(aqi(99.0)).is_none());
        assert!(service.alert(aqi(100.0)).is_some());
    }

    #[tokio::test]
    async fn load_reads_store() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_load_table()
            .times(1)
            .returning(|| Ok(RecommendationTable::standard()));

        let service = HealthAdvisoryService::load(&store, AlertThresholds::default(), true)
            .await
            .unwrap();
        assert_eq!(service.table().len(), 6);
    }

    #[tokio::test]
    async fn load_propagates_store_errors() {
        let mut store = MockRecommendationStore::new();
        store
            .expect_load_table()
            .returning(|| Err(ApplicationError::Internal("db gone".into())));

        let result = HealthAdvisoryService::load(&store, AlertThresholds::default(), true).await;
        assert!(matches!(result, Err(ApplicationError::Internal(_))));
    }
}
