//! SQLite-based location and reading persistence

use std::sync::Arc;

use application::{error::ApplicationError, ports::AirQualityStore};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use domain::{AirQualityReading, GeoLocation, Location, LocationId, NewReading, PollutantLevels};
use rusqlite::{OptionalExtension, Row, params, types::Type};
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

const READING_COLUMNS: &str =
    "id, location_id, aqi, pm25, pm10, o3, no2, so2, co, timestamp";

/// SQLite-based air quality store
#[derive(Debug, Clone)]
pub struct SqliteAirQualityStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteAirQualityStore {
    /// Create a new SQLite air quality store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    async fn query_readings(
        &self,
        sql: String,
        location_id: i64,
        bound: ReadingBound,
    ) -> Result<Vec<AirQualityReading>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let rows = match bound {
                ReadingBound::Limit(limit) => {
                    stmt.query_map(params![location_id, limit], row_to_reading)
                },
                ReadingBound::Since(since) => {
                    stmt.query_map(params![location_id, since], row_to_reading)
                },
            }
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

enum ReadingBound {
    Limit(u32),
    Since(String),
}

#[async_trait]
impl AirQualityStore for SqliteAirQualityStore {
    #[instrument(skip(self))]
    async fn list_locations(&self) -> Result<Vec<Location>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare("SELECT id, name, latitude, longitude FROM locations ORDER BY id")
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let locations = stmt
                .query_map([], row_to_location)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count = locations.len(), "Listed locations");
            Ok(locations)
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(location_id = %id))]
    async fn get_location(&self, id: LocationId) -> Result<Option<Location>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            conn.query_row(
                "SELECT id, name, latitude, longitude FROM locations WHERE id = ?1",
                [id.as_i64()],
                row_to_location,
            )
            .optional()
            .map_err(|e| ApplicationError::Internal(e.to_string()))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }

    #[instrument(skip(self), fields(location_id = %location_id))]
    async fn latest_reading(
        &self,
        location_id: LocationId,
    ) -> Result<Option<AirQualityReading>, ApplicationError> {
        Ok(self.history(location_id, 1).await?.into_iter().next())
    }

    #[instrument(skip(self), fields(location_id = %location_id))]
    async fn history(
        &self,
        location_id: LocationId,
        limit: u32,
    ) -> Result<Vec<AirQualityReading>, ApplicationError> {
        let sql = format!(
            "SELECT {READING_COLUMNS} FROM air_quality_data
             WHERE location_id = ?1
             ORDER BY timestamp DESC, id DESC
             LIMIT ?2"
        );
        self.query_readings(sql, location_id.as_i64(), ReadingBound::Limit(limit))
            .await
    }

    #[instrument(skip(self), fields(location_id = %location_id))]
    async fn readings_since(
        &self,
        location_id: LocationId,
        since: DateTime<Utc>,
    ) -> Result<Vec<AirQualityReading>, ApplicationError> {
        let sql = format!(
            "SELECT {READING_COLUMNS} FROM air_quality_data
             WHERE location_id = ?1 AND timestamp >= ?2
             ORDER BY timestamp ASC, id ASC"
        );
        self.query_readings(
            sql,
            location_id.as_i64(),
            ReadingBound::Since(format_timestamp(since)),
        )
        .await
    }

    #[instrument(skip(self, reading), fields(location_id = %reading.location_id, aqi = %reading.aqi))]
    async fn insert_reading(
        &self,
        reading: &NewReading,
    ) -> Result<AirQualityReading, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let mut reading = reading.clone();
        reading.recorded_at = reading.recorded_at.trunc_subsecs(3);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let levels = reading.pollutants;
            conn.execute(
                "INSERT INTO air_quality_data
                    (location_id, aqi, pm25, pm10, o3, no2, so2, co, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    reading.location_id.as_i64(),
                    reading.aqi.value(),
                    levels.pm25,
                    levels.pm10,
                    levels.o3,
                    levels.no2,
                    levels.so2,
                    levels.co,
                    format_timestamp(reading.recorded_at),
                ],
            )
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let id = conn.last_insert_rowid();
            debug!(reading_id = id, "Stored reading");
            Ok(reading.into_stored(id))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

/// Timestamps are stored as fixed-width RFC 3339 UTC text so they sort
/// lexically in time order.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|t| t.and_utc())
        })
}

fn row_to_location(row: &Row<'_>) -> rusqlite::Result<Location> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let latitude: f64 = row.get(2)?;
    let longitude: f64 = row.get(3)?;

    let coordinates = GeoLocation::new(latitude, longitude)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Real, Box::new(e)))?;

    Ok(Location::new(LocationId::new(id), name, coordinates))
}

fn row_to_reading(row: &Row<'_>) -> rusqlite::Result<AirQualityReading> {
    let timestamp: String = row.get(9)?;
    let recorded_at = parse_timestamp(&timestamp).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            Type::Text,
            format!("invalid timestamp: {timestamp}").into(),
        )
    })?;

    Ok(AirQualityReading {
        id: row.get(0)?,
        location_id: LocationId::new(row.get(1)?),
        aqi: row.get(2)?,
        pollutants: PollutantLevels {
            pm25: row.get(3)?,
            pm10: row.get(4)?,
            o3: row.get(5)?,
            no2: row.get(6)?,
            so2: row.get(7)?,
            co: row.get(8)?,
        },
        recorded_at,
    })
}
