//! Recommendation table configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// How the recommendation table is checked at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsConfig {
    /// Refuse to start when the stored ranges have gaps, overlaps, inverted
    /// ranges or do not start at 0. When off, those are logged at `warn`.
    #[serde(default = "default_true")]
    pub strict_tiling: bool,
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            strict_tiling: true,
        }
    }
}
