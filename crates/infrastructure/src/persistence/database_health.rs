//! SQLite database health adapter
//!
//! Implements the `DatabaseHealthPort` using the connection pool.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{DatabaseHealth, DatabaseHealthPort};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::ConnectionPool;

/// SQLite database health adapter
pub struct SqliteDatabaseHealth {
    pool: Arc<ConnectionPool>,
}

impl std::fmt::Debug for SqliteDatabaseHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabaseHealth")
            .field("pool", &"<ConnectionPool>")
            .finish()
    }
}

impl SqliteDatabaseHealth {
    /// Create a new database health adapter with the given connection pool
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseHealthPort for SqliteDatabaseHealth {
    #[instrument(skip(self))]
    async fn is_available(&self) -> bool {
        let pool = Arc::clone(&self.pool);
        let result = tokio::task::spawn_blocking(move || {
            pool.get()
                .ok()
                .and_then(|conn| {
                    conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
                        .ok()
                })
                .is_some()
        })
        .await;

        match result {
            Ok(available) => {
                if available {
                    debug!("Database health check passed");
                } else {
                    warn!("Database health check failed: unable to execute query");
                }
                available
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed: task panicked");
                false
            },
        }
    }

    #[instrument(skip(self))]
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let start = std::time::Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let conn = pool.get().map_err(|e| {
                ApplicationError::Internal(format!("Failed to get database connection: {e}"))
            })?;

            let version: String = conn
                .query_row("SELECT sqlite_version()", [], |row| row.get(0))
                .map_err(|e| {
                    ApplicationError::Internal(format!("Health check query failed: {e}"))
                })?;

            Ok::<_, ApplicationError>(version)
        })
        .await
        .map_err(|e| {
            ApplicationError::Internal(format!("Database health check task failed: {e}"))
        })?;

        match result {
            Ok(version) => {
                let response_time_ms =
                    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                debug!(
                    version = %version,
                    response_time_ms = response_time_ms,
                    "Database health check passed"
                );

                Ok(DatabaseHealth::reachable(format!("SQLite {version}"))
                    .with_response_time(response_time_ms))
            },
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                Ok(DatabaseHealth::unreachable())
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{config::DatabaseConfig, persistence::create_pool};

    fn adapter() -> SqliteDatabaseHealth {
        let pool = create_pool(&DatabaseConfig::in_memory()).unwrap();
        SqliteDatabaseHealth::new(Arc::new(pool))
    }

    #[tokio::test]
    async fn in_memory_database_is_available() {
        assert!(adapter().is_available().await);
    }

    #[tokio::test]
    async fn check_health_reports_version() {
        let health = adapter().check_health().await.unwrap();
        assert!(health.reachable);
        assert!(health.version.unwrap().starts_with("SQLite 3."));
        assert!(health.response_time_ms.is_some());
    }

    #[test]
    fn debug_hides_pool() {
        let debug = format!("{:?}", adapter());
        assert!(debug.contains("<ConnectionPool>"));
    }
}
