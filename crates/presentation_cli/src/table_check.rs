//! Recommendation table check
//!
//! Loads the stored recommendation ranges from an existing database and
//! reports tiling problems without starting the server.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use application::ports::RecommendationStore;
use domain::{IssueSeverity, TilingIssue};
use infrastructure::{SqliteRecommendationStore, open_existing};
use tracing::{debug, info};

/// Outcome of checking a stored table
#[derive(Debug)]
pub struct TableReport {
    /// Number of stored ranges
    pub records: usize,
    /// Tiling problems, errors and warnings
    pub issues: Vec<TilingIssue>,
}

impl TableReport {
    /// Whether any issue would block a strict server start
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == IssueSeverity::Error)
    }
}

/// Check the recommendation table stored in `database`
///
/// The database is opened as-is; no migrations or seed data are applied.
pub async fn check_table(database: &Path) -> Result<TableReport> {
    let path = database
        .to_str()
        .context("Database path is not valid UTF-8")?;
    debug!(path, "Opening database for table check");

    let pool = open_existing(path)
        .with_context(|| format!("Failed to open database {}", database.display()))?;
    let store = SqliteRecommendationStore::new(Arc::new(pool));

    let table = store
        .load_table()
        .await
        .context("Failed to load recommendation table")?;
    let issues = table.tiling_issues();

    info!(records = table.len(), issues = issues.len(), "Checked recommendation table");
    Ok(TableReport {
        records: table.len(),
        issues,
    })
}
