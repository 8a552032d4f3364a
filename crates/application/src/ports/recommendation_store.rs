//! Recommendation storage port

use async_trait::async_trait;
use domain::RecommendationTable;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading the seeded recommendation records
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Every record in lookup order
    async fn load_table(&self) -> Result<RecommendationTable, ApplicationError>;
}
