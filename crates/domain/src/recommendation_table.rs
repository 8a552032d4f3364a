//! Ordered recommendation records and range lookup
//!
//! Records are whole-AQI ranges. Two neighbours are contiguous when
//! `next.aqi_min == prev.aqi_max + 1`. Lookup is a linear scan in table
//! order and the first containing record wins, so overlapping tables still
//! resolve deterministically.

use std::fmt;

use serde::Serialize;

use crate::{
    entities::HealthRecommendation,
    errors::DomainError,
    value_objects::Aqi,
};

/// How serious a tiling problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Lookups still work but some values resolve to NotFound
    Warning,
    /// The table is malformed
    Error,
}

/// A defect in how the records cover `[0, ∞)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TilingIssue {
    /// No records at all
    Empty,
    /// `aqi_min > aqi_max`
    Inverted {
        /// Lower bound
        aqi_min: u32,
        /// Upper bound
        aqi_max: u32,
    },
    /// Lowest range does not start at zero
    NonZeroStart {
        /// First covered value
        aqi_min: u32,
    },
    /// Values between two ranges are not covered
    Gap {
        /// First uncovered value
        from: u32,
        /// Last uncovered value
        to: u32,
    },
    /// Two ranges share values
    Overlap {
        /// First shared value
        from: u32,
        /// Last shared value
        to: u32,
    },
    /// Highest range has a finite upper bound
    BoundedTop {
        /// Largest covered value
        aqi_max: u32,
    },
}

impl TilingIssue {
    /// Severity of this issue
    #[must_use]
    pub const fn severity(&self) -> IssueSeverity {
        match self {
            Self::BoundedTop { .. } => IssueSeverity::Warning,
            _ => IssueSeverity::Error,
        }
    }
}

impl fmt::Display for TilingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no recommendation ranges defined"),
            Self::Inverted { aqi_min, aqi_max } => {
                write!(f, "range {aqi_min}-{aqi_max} is inverted")
            },
            Self::NonZeroStart { aqi_min } => {
                write!(f, "lowest range starts at {aqi_min} instead of 0")
            },
            Self::Gap { from, to } => write!(f, "AQI {from}-{to} is not covered"),
            Self::Overlap { from, to } => {
                write!(f, "AQI {from}-{to} is covered by more than one range")
            },
            Self::BoundedTop { aqi_max } => {
                write!(f, "values above {aqi_max} have no recommendation")
            },
        }
    }
}

/// Read-only set of recommendation records, kept in lookup order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecommendationTable {
    records: Vec<HealthRecommendation>,
}

impl RecommendationTable {
    /// Wrap records in the given lookup order
    #[must_use]
    pub const fn new(records: Vec<HealthRecommendation>) -> Self {
        Self { records }
    }

    /// Records in lookup order
    #[must_use]
    pub fn records(&self) -> &[HealthRecommendation] {
        &self.records
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose range contains `aqi`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RecommendationNotFound` when no range contains
    /// the value.
    pub fn resolve(&self, aqi: Aqi) -> Result<&HealthRecommendation, DomainError> {
        self.records
            .iter()
            .find(|record| record.contains(aqi))
            .ok_or(DomainError::RecommendationNotFound { aqi: aqi.value() })
    }

    /// Every coverage defect, lowest range first
    #[must_use]
    pub fn tiling_issues(&self) -> Vec<TilingIssue> {
        if self.records.is_empty() {
            return vec![TilingIssue::Empty];
        }

        let mut issues = Vec::new();
        let mut ranges: Vec<(u32, Option<u32>)> = Vec::with_capacity(self.records.len());
        for record in &self.records {
            match record.aqi_max {
                Some(max) if record.aqi_min > max => issues.push(TilingIssue::Inverted {
                    aqi_min: record.aqi_min,
                    aqi_max: max,
                }),
                max => ranges.push((record.aqi_min, max)),
            }
        }
        if ranges.is_empty() {
            return issues;
        }
        ranges.sort_by_key(|(min, max)| (*min, max.map_or(u64::MAX, u64::from)));

        if ranges[0].0 > 0 {
            issues.push(TilingIssue::NonZeroStart {
                aqi_min: ranges[0].0,
            });
        }

        // Highest value covered so far; `None` once an open-ended range is seen.
        let mut covered_to: Option<u32> = ranges[0].1;
        for &(min, max) in &ranges[1..] {
            let Some(prev_max) = covered_to else {
                issues.push(TilingIssue::Overlap {
                    from: min,
                    to: max.unwrap_or(u32::MAX),
                });
                continue;
            };

            if u64::from(min) > u64::from(prev_max) + 1 {
                issues.push(TilingIssue::Gap {
                    from: prev_max + 1,
                    to: min - 1,
                });
            } else if min <= prev_max {
                let to = max.map_or(prev_max, |m| m.min(prev_max));
                issues.push(TilingIssue::Overlap { from: min, to });
            }

            covered_to = max.map(|m| m.max(prev_max));
        }

        if let Some(top) = covered_to {
            issues.push(TilingIssue::BoundedTop { aqi_max: top });
        }

        issues
    }

    /// Check the tiling, returning the warnings
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRecommendationTable` listing every
    /// error-severity issue.
    pub fn validate(&self) -> Result<Vec<TilingIssue>, DomainError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .tiling_issues()
            .into_iter()
            .partition(|issue| issue.severity() == IssueSeverity::Error);

        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(DomainError::InvalidRecommendationTable(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ))
        }
    }

    /// Default table seeded into a fresh database
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            HealthRecommendation::new(
                0,
                50,
                "Air quality is good. Enjoy your usual outdoor activities.",
                "Perfect conditions for outdoor exercise and keeping windows open.",
            ),
            HealthRecommendation::new(
                51,
                100,
                "Air quality is acceptable. Unusually sensitive people should watch for symptoms.",
                "Most outdoor activities are fine. Sensitive people may shorten long or intense sessions.",
            ),
            HealthRecommendation::new(
                101,
                150,
                "Sensitive groups may experience health effects. The general public is less likely to be affected.",
                "Children, older adults and people with heart or lung disease should reduce prolonged outdoor exertion.",
            ),
            HealthRecommendation::new(
                151,
                200,
                "Everyone may begin to experience health effects. Sensitive groups may feel more serious effects.",
                "Limit prolonged outdoor exertion. Sensitive groups should stay indoors.",
            ),
            HealthRecommendation::new(
                201,
                300,
                "Health alert: the risk of health effects is increased for everyone.",
                "Avoid outdoor exertion. Keep windows closed and use an air purifier if available.",
            ),
            HealthRecommendation::new(
                301,
                500,
                "Health warning of emergency conditions. Everyone is likely to be affected.",
                "Stay indoors and avoid all physical activity outdoors.",
            ),
        ])
    }
}

impl From<Vec<HealthRecommendation>> for RecommendationTable {
    fn from(records: Vec<HealthRecommendation>) -> Self {
        Self::new(records)
    }
}
