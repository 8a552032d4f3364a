//! Integration tests for the SQLite stores against a file-backed database
//!
//! These tests drive the application services through the real stores.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use application::{AirQualityService, AirQualityStore, HealthAdvisoryService};
use chrono::{Duration, Utc};
use domain::{Aqi, AlertThresholds, AqiBand, LocationId, NewReading, PollutantLevels};
use infrastructure::{
    DatabaseConfig, SqliteAirQualityStore, SqliteRecommendationStore, create_pool, open_existing,
};
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn file_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        path: dir.path().join("airwatch.db").to_string_lossy().into_owned(),
        ..DatabaseConfig::default()
    }
}

fn reading(location: i64, aqi: f64, hours_ago: i64) -> NewReading {
    NewReading {
        location_id: LocationId::new(location),
        aqi: Aqi::new(aqi).unwrap(),
        pollutants: PollutantLevels {
            pm25: Some(aqi / 2.0),
            ..PollutantLevels::default()
        },
        recorded_at: Utc::now() - Duration::hours(hours_ago),
    }
}

// ============================================================================
// Store Tests
// ============================================================================

mod store_tests {
    use super::*;

    #[tokio::test]
    async fn readings_survive_reopening_the_file() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);

        {
            let pool = Arc::new(create_pool(&config).unwrap());
            let store = SqliteAirQualityStore::new(pool);
            store.insert_reading(&reading(1, 42.0, 2)).await.unwrap();
            store.insert_reading(&reading(1, 58.5, 1)).await.unwrap();
        }

        let pool = Arc::new(create_pool(&config).unwrap());
        let store = SqliteAirQualityStore::new(pool);
        let history = store.history(LocationId::new(1), 10).await.unwrap();

        assert_eq!(history.len(), 2);
        assert!((history[0].aqi - 58.5).abs() < f64::EPSILON);
        assert!((history[1].aqi - 42.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn open_existing_sees_migrated_schema() {
        let dir = TempDir::new().unwrap();
        let config = file_config(&dir);
        drop(create_pool(&config).unwrap());

        let pool = Arc::new(open_existing(&config.path).unwrap());
        let locations = SqliteAirQualityStore::new(pool)
            .list_locations()
            .await
            .unwrap();
        assert_eq!(locations.len(), 5);
    }

    #[test]
    fn open_existing_rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.db");
        assert!(open_existing(&missing.to_string_lossy()).is_err());
    }
}

// ============================================================================
// Service Tests
// ============================================================================

mod service_tests {
    use super::*;

    fn service(dir: &TempDir) -> (AirQualityService, Arc<SqliteAirQualityStore>) {
        let pool = Arc::new(create_pool(&file_config(dir)).unwrap());
        let store = Arc::new(SqliteAirQualityStore::new(pool));
        (AirQualityService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn lists_seeded_locations_with_latest() {
        let dir = TempDir::new().unwrap();
        let (service, store) = service(&dir);
        store.insert_reading(&reading(2, 130.0, 0)).await.unwrap();

        let snapshots = service.list_locations_with_latest().await.unwrap();
        assert_eq!(snapshots.len(), 5);

        let with_reading: Vec<_> = snapshots.iter().filter(|s| s.latest.is_some()).collect();
        assert_eq!(with_reading.len(), 1);
        assert_eq!(with_reading[0].location.name, "Electronic City");
    }

    #[tokio::test]
    async fn compares_locations_by_latest_reading() {
        let dir = TempDir::new().unwrap();
        let (service, store) = service(&dir);
        store.insert_reading(&reading(1, 210.0, 0)).await.unwrap();
        store.insert_reading(&reading(3, 45.0, 0)).await.unwrap();

        let comparison = service.compare_locations().await.unwrap();

        assert_eq!(comparison.ranking.len(), 2);
        assert_eq!(comparison.ranking[0].name, "Koramangala");
        assert_eq!(comparison.ranking[0].band, AqiBand::Good);
        assert_eq!(comparison.ranking[1].name, "Whitefield");
        assert_eq!(comparison.unranked.len(), 3);
        assert!(comparison.insight.unwrap().starts_with("Major air quality difference"));
    }

    #[tokio::test]
    async fn daily_summary_groups_todays_readings() {
        let dir = TempDir::new().unwrap();
        let (service, store) = service(&dir);
        let now = Utc::now();
        for aqi in [40.0, 60.0, 80.0] {
            store
                .insert_reading(&NewReading {
                    recorded_at: now,
                    ..reading(4, aqi, 0)
                })
                .await
                .unwrap();
        }

        let summaries = service
            .daily_summary(LocationId::new(4), Some(1))
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].date, now.date_naive());
        assert_eq!(summaries[0].average, 60);
        assert_eq!(summaries[0].readings, 3);
    }

    #[tokio::test]
    async fn unknown_location_is_not_found() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service(&dir);
        let err = service.history(LocationId::new(99), None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn advisory_service_loads_seeded_table() {
        let dir = TempDir::new().unwrap();
        let pool = Arc::new(create_pool(&file_config(&dir)).unwrap());
        let store = SqliteRecommendationStore::new(pool);

        let advisory = HealthAdvisoryService::load(&store, AlertThresholds::default(), true)
            .await
            .unwrap();

        let record = advisory.recommendation(Aqi::new(155.4).unwrap()).unwrap();
        assert_eq!(record.aqi_min, 151);
        assert!(advisory.alert(Aqi::new(320.0).unwrap()).is_some());
    }
}
