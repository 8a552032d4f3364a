//! Database health check port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Result of probing the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseHealth {
    /// Whether a trivial query succeeded
    pub reachable: bool,
    /// Engine version, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Probe duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl DatabaseHealth {
    /// Reachable database with version info
    #[must_use]
    pub fn reachable(version: impl Into<String>) -> Self {
        Self {
            reachable: true,
            version: Some(version.into()),
            response_time_ms: None,
        }
    }

    /// Unreachable database
    #[must_use]
    pub const fn unreachable() -> Self {
        Self {
            reachable: false,
            version: None,
            response_time_ms: None,
        }
    }

    /// Attach the probe duration
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }
}

/// Port for database readiness checks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Run `SELECT 1`, returning whether it worked
    async fn is_available(&self) -> bool;

    /// Probe with version and timing
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}
