//! Air quality dashboard service
//!
//! Lists locations with their latest reading, serves history, refreshes a
//! location from the upstream API, ranks locations and builds daily
//! summaries.

use std::{fmt, sync::Arc};

use chrono::{Days, NaiveTime, Utc};
use domain::{
    AirQualityReading, DailySummary, Location, LocationComparison, LocationId, LocationSnapshot,
    NewReading, compare_locations, daily_summaries,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{AirQualityStore, PollutionDataPort},
};

/// Limits applied to caller-supplied counts
#[derive(Debug, Clone)]
pub struct AirQualityServiceConfig {
    /// History length when none is requested (default: 24)
    pub default_history_limit: u32,
    /// Largest history length served (default: 720)
    pub max_history_limit: u32,
    /// Summary window when none is requested (default: 7)
    pub default_summary_days: u32,
    /// Largest summary window served (default: 90)
    pub max_summary_days: u32,
}

impl Default for AirQualityServiceConfig {
    fn default() -> Self {
        Self {
            default_history_limit: 24,
            max_history_limit: 720,
            default_summary_days: 7,
            max_summary_days: 90,
        }
    }
}

impl AirQualityServiceConfig {
    /// Requested history length, defaulted and clamped to `[1, max]`
    #[must_use]
    pub fn history_limit(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_history_limit)
            .clamp(1, self.max_history_limit.max(1))
    }

    /// Requested summary window, defaulted and clamped to `[1, max]`
    #[must_use]
    pub fn summary_days(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_summary_days)
            .clamp(1, self.max_summary_days.max(1))
    }
}

/// Service behind the dashboard's air quality endpoints
pub struct AirQualityService {
    store: Arc<dyn AirQualityStore>,
    pollution: Option<Arc<dyn PollutionDataPort>>,
    config: AirQualityServiceConfig,
}

impl fmt::Debug for AirQualityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirQualityService")
            .field("has_pollution_source", &self.pollution.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AirQualityService {
    /// Create a service without an upstream source; `refresh` will fail
    #[must_use]
    pub fn new(store: Arc<dyn AirQualityStore>) -> Self {
        Self {
            store,
            pollution: None,
            config: AirQualityServiceConfig::default(),
        }
    }

    /// Attach the upstream pollution source
    #[must_use]
    pub fn with_pollution_source(mut self, pollution: Arc<dyn PollutionDataPort>) -> Self {
        self.pollution = Some(pollution);
        self
    }

    /// Override limits
    #[must_use]
    pub fn with_config(mut self, config: AirQualityServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Limits in use
    #[must_use]
    pub const fn config(&self) -> &AirQualityServiceConfig {
        &self.config
    }

    /// Whether an upstream source is attached
    #[must_use]
    pub fn has_pollution_source(&self) -> bool {
        self.pollution.is_some()
    }

    /// Whether an upstream source is attached and able to serve requests
    pub async fn pollution_source_available(&self) -> bool {
        match &self.pollution {
            Some(pollution) => pollution.is_available().await,
            None => false,
        }
    }

    /// Every location with its latest reading
    #[instrument(skip(self))]
    pub async fn list_locations_with_latest(
        &self,
    ) -> Result<Vec<LocationSnapshot>, ApplicationError> {
        let locations = self.store.list_locations().await?;
        let mut snapshots = Vec::with_capacity(locations.len());
        for location in locations {
            let latest = self.store.latest_reading(location.id).await?;
            snapshots.push(LocationSnapshot { location, latest });
        }
        debug!(count = snapshots.len(), "Listed locations");
        Ok(snapshots)
    }

    /// Readings for one location, newest first
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        location_id: LocationId,
        limit: Option<u32>,
    ) -> Result<Vec<AirQualityReading>, ApplicationError> {
        self.require_location(location_id).await?;
        let limit = self.config.history_limit(limit);
        self.store.history(location_id, limit).await
    }

    /// Fetch current pollution for a location and store it
    ///
    /// The stored reading is stamped with the fetch time, not the upstream
    /// measurement time.
    #[instrument(skip(self))]
    pub async fn refresh(
        &self,
        location_id: LocationId,
    ) -> Result<AirQualityReading, ApplicationError> {
        let location = self.require_location(location_id).await?;
        let Some(pollution) = &self.pollution else {
            warn!("Refresh requested but no pollution source is configured");
            return Err(ApplicationError::Configuration(
                "pollution data source is not configured".to_string(),
            ));
        };

        let snapshot = pollution.current_pollution(&location.coordinates).await?;
        let reading = NewReading::now(location.id, snapshot.aqi, snapshot.pollutants);
        let stored = self.store.insert_reading(&reading).await?;

        info!(
            location = %location.name,
            aqi = %snapshot.aqi,
            reading_id = stored.id,
            observed_at = %snapshot.observed_at,
            "Stored refreshed reading"
        );
        Ok(stored)
    }

    /// Rank all locations by latest AQI
    #[instrument(skip(self))]
    pub async fn compare_locations(&self) -> Result<LocationComparison, ApplicationError> {
        let snapshots = self.list_locations_with_latest().await?;
        Ok(compare_locations(&snapshots))
    }

    /// Per-day AQI statistics for the last `days` UTC days
    #[instrument(skip(self))]
    pub async fn daily_summary(
        &self,
        location_id: LocationId,
        days: Option<u32>,
    ) -> Result<Vec<DailySummary>, ApplicationError> {
        self.require_location(location_id).await?;
        let days = self.config.summary_days(days);

        let today = Utc::now().date_naive();
        let first_day = today
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .unwrap_or(today);
        let since = first_day.and_time(NaiveTime::MIN).and_utc();

        let readings = self.store.readings_since(location_id, since).await?;
        Ok(daily_summaries(&readings, days, today))
    }

    async fn require_location(&self, id: LocationId) -> Result<Location, ApplicationError> {
        self.store
            .get_location(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Location {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockAirQualityStore, MockPollutionDataPort, PollutionSnapshot};
    use chrono::Duration;
    use domain::{Aqi, GeoLocation, Pollutant, PollutantLevels};

    fn location(id: i64, name: &str) -> Location {
        Location::new(
            LocationId::new(id),
            name,
            GeoLocation::new(12.97, 77.59).unwrap(),
        )
    }

    fn reading(id: i64, location_id: i64, aqi: f64) -> AirQualityReading {
        AirQualityReading {
            id,
            location_id: LocationId::new(location_id),
            aqi,
            pollutants: PollutantLevels::default(),
            recorded_at: Utc::now(),
        }
    }

    fn store_with_location() -> MockAirQualityStore {
        let mut store = MockAirQualityStore::new();
        store
            .expect_get_location()
            .returning(|id| Ok((id.as_i64() == 1).then(|| location(1, "Whitefield"))));
        store
    }

    #[test]
    fn history_limit_defaults_and_clamps() {
        let config = AirQualityServiceConfig::default();
        assert_eq!(config.history_limit(None), 24);
        assert_eq!(config.history_limit(Some(0)), 1);
        assert_eq!(config.history_limit(Some(5_000)), 720);
        assert_eq!(config.history_limit(Some(48)), 48);
    }

    #[test]
    fn summary_days_defaults_and_clamps() {
        let config = AirQualityServiceConfig::default();
        assert_eq!(config.summary_days(None), 7);
        assert_eq!(config.summary_days(Some(0)), 1);
        assert_eq!(config.summary_days(Some(365)), 90);
    }

    #[tokio::test]
    async fn lists_locations_with_latest() {
        let mut store = MockAirQualityStore::new();
        store
            .expect_list_locations()
            .times(1)
            .returning(|| Ok(vec![location(1, "Whitefield"), location(2, "Jayanagar")]));
        store.expect_latest_reading().times(2).returning(|id| {
            Ok((id.as_i64() == 1).then(|| reading(10, 1, 88.0)))
        });

        let service = AirQualityService::new(Arc::new(store));
        let snapshots = service.list_locations_with_latest().await.unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].latest.as_ref().map(|r| r.id), Some(10));
        assert!(snapshots[1].latest.is_none());
    }

    #[tokio::test]
    async fn history_uses_default_limit() {
        let mut store = store_with_location();
        store
            .expect_history()
            .withf(|id, limit| id.as_i64() == 1 && *limit == 24)
            .times(1)
            .returning(|_, _| Ok(vec![reading(1, 1, 50.0)]));

        let service = AirQualityService::new(Arc::new(store));
        let history = service.history(LocationId::new(1), None).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn history_of_unknown_location_is_not_found() {
        let store = store_with_location();
        let service = AirQualityService::new(Arc::new(store));

        let err = service.history(LocationId::new(99), None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn refresh_stores_upstream_snapshot() {
        let mut store = store_with_location();
        store
            .expect_insert_reading()
            .withf(|r| r.location_id.as_i64() == 1 && (r.aqi.value() - 150.0).abs() < f64::EPSILON)
            .times(1)
            .returning(|r| Ok(r.clone().into_stored(42)));

        let mut pollution = MockPollutionDataPort::new();
        pollution.expect_current_pollution().times(1).returning(|_| {
            Ok(PollutionSnapshot {
                aqi: Aqi::new(150.0).unwrap(),
                pollutants: PollutantLevels::empty().with(Pollutant::Pm25, 61.2),
                observed_at: Utc::now(),
            })
        });

        let service =
            AirQualityService::new(Arc::new(store)).with_pollution_source(Arc::new(pollution));
        let stored = service.refresh(LocationId::new(1)).await.unwrap();

        assert_eq!(stored.id, 42);
        assert_eq!(stored.pollutants.pm25, Some(61.2));
    }

    #[tokio::test]
    async fn refresh_stamps_fetch_time() {
        let observed_at = Utc::now() - Duration::hours(3);
        let before = Utc::now();

        let mut store = store_with_location();
        store
            .expect_insert_reading()
            .withf(move |r| r.recorded_at >= before)
            .times(1)
            .returning(|r| Ok(r.clone().into_stored(7)));

        let mut pollution = MockPollutionDataPort::new();
        pollution.expect_current_pollution().times(1).returning(move |_| {
            Ok(PollutionSnapshot {
                aqi: Aqi::new(80.0).unwrap(),
                pollutants: PollutantLevels::empty(),
                observed_at,
            })
        });

        let service =
            AirQualityService::new(Arc::new(store)).with_pollution_source(Arc::new(pollution));
        let stored = service.refresh(LocationId::new(1)).await.unwrap();

        assert!(stored.recorded_at > observed_at);
    }

    #[tokio::test]
    async fn refresh_unknown_location_skips_upstream() {
        let store = store_with_location();
        let mut pollution = MockPollutionDataPort::new();
        pollution.expect_current_pollution().never();

        let service =
            AirQualityService::new(Arc::new(store)).with_pollution_source(Arc::new(pollution));
        let err = service.refresh(LocationId::new(5)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn refresh_without_source_is_configuration_error() {
        let service = AirQualityService::new(Arc::new(store_with_location()));
        let err = service.refresh(LocationId::new(1)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
        assert!(!service.pollution_source_available().await);
    }

    #[tokio::test]
    async fn availability_follows_source() {
        let mut pollution = MockPollutionDataPort::new();
        pollution.expect_is_available().times(1).returning(|| true);

        let service = AirQualityService::new(Arc::new(MockAirQualityStore::new()))
            .with_pollution_source(Arc::new(pollution));
        assert!(service.pollution_source_available().await);
    }

    #[tokio::test]
    async fn refresh_propagates_upstream_failure() {
        let mut store = store_with_location();
        store.expect_insert_reading().never();
        let mut pollution = MockPollutionDataPort::new();
        pollution
            .expect_current_pollution()
            .returning(|_| Err(ApplicationError::RateLimited));

        let service =
            AirQualityService::new(Arc::new(store)).with_pollution_source(Arc::new(pollution));
        let err = service.refresh(LocationId::new(1)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::RateLimited));
    }

    #[tokio::test]
    async fn compare_ranks_cleanest_first() {
        let mut store = MockAirQualityStore::new();
        store
            .expect_list_locations()
            .returning(|| Ok(vec![location(1, "Whitefield"), location(2, "Jayanagar")]));
        store.expect_latest_reading().returning(|id| {
            let aqi = if id.as_i64() == 1 { 140.0 } else { 30.0 };
            Ok(Some(reading(id.as_i64(), id.as_i64(), aqi)))
        });

        let service = AirQualityService::new(Arc::new(store));
        let comparison = service.compare_locations().await.unwrap();

        assert_eq!(comparison.ranking[0].name, "Jayanagar");
        assert_eq!(comparison.ranking[1].rank, 2);
        assert!(
            comparison
                .insight
                .as_deref()
                .is_some_and(|s| s.starts_with("Major air quality difference"))
        );
    }

    #[tokio::test]
    async fn daily_summary_queries_window_start() {
        let mut store = store_with_location();
        store
            .expect_readings_since()
            .withf(|id, since| {
                let expected_start = (Utc::now() - Duration::days(6)).date_naive();
                id.as_i64() == 1 && since.date_naive() == expected_start
            })
            .times(1)
            .returning(|_, _| Ok(vec![reading(1, 1, 40.0), reading(2, 1, 60.0)]));

        let service = AirQualityService::new(Arc::new(store));
        let summary = service
            .daily_summary(LocationId::new(1), None)
            .await
            .unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].average, 50);
    }
}
