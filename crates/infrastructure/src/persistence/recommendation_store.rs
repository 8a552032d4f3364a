//! SQLite-based recommendation table

use std::sync::Arc;

use application::{error::ApplicationError, ports::RecommendationStore};
use async_trait::async_trait;
use domain::{HealthRecommendation, RecommendationTable};
use rusqlite::Row;
use tokio::task;
use tracing::{debug, instrument};

use super::connection::ConnectionPool;

/// Reads `health_recommendations` in insertion order
#[derive(Debug, Clone)]
pub struct SqliteRecommendationStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteRecommendationStore {
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationStore for SqliteRecommendationStore {
    #[instrument(skip(self))]
    async fn load_table(&self) -> Result<RecommendationTable, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool
                .get()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let mut stmt = conn
                .prepare(
                    "SELECT aqi_min, aqi_max, message, activity_guidance
                     FROM health_recommendations
                     ORDER BY id",
                )
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            let records = stmt
                .query_map([], row_to_recommendation)
                .map_err(|e| ApplicationError::Internal(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ApplicationError::Internal(e.to_string()))?;

            debug!(count = records.len(), "Loaded recommendation table");
            Ok(RecommendationTable::new(records))
        })
        .await
        .map_err(|e| ApplicationError::Internal(e.to_string()))?
    }
}

fn row_to_recommendation(row: &Row<'_>) -> rusqlite::Result<HealthRecommendation> {
    Ok(HealthRecommendation {
        aqi_min: row.get(0)?,
        aqi_max: row.get(1)?,
        message: row.get(2)?,
        activity_guidance: row.get(3)?,
    })
}
