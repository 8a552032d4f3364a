//! Cross-location comparison and per-day summaries

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::{
    entities::{AirQualityReading, Location},
    value_objects::{Aqi, AqiBand, LocationId},
};

/// A location together with its most recent reading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSnapshot {
    /// The location
    pub location: Location,
    /// Latest reading, if any was ever stored
    pub latest: Option<AirQualityReading>,
}

impl LocationSnapshot {
    /// Latest AQI when present and valid
    #[must_use]
    pub fn latest_aqi(&self) -> Option<f64> {
        self.latest
            .as_ref()
            .and_then(|r| r.validated_aqi().ok())
            .map(|aqi| aqi.value())
    }
}

/// Position of a location in the cleanest-first ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLocation {
    /// 1 is the cleanest
    pub rank: usize,
    /// Location identifier
    pub location_id: LocationId,
    /// Location name
    pub name: String,
    /// Latest AQI
    pub aqi: f64,
    /// Band of the latest AQI
    pub band: AqiBand,
}

/// Spread of the latest AQI across ranked locations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComparisonStats {
    /// Lowest AQI
    pub min: f64,
    /// Highest AQI
    pub max: f64,
    /// Mean AQI
    pub average: f64,
    /// `max - min`
    pub spread: f64,
}

/// Result of comparing locations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationComparison {
    /// Locations with a valid latest AQI, cleanest first
    pub ranking: Vec<RankedLocation>,
    /// Locations without a usable reading
    pub unranked: Vec<Location>,
    /// Present when at least one location is ranked
    pub stats: Option<ComparisonStats>,
    /// Present when at least two locations are ranked
    pub insight: Option<String>,
}

/// Rank locations by latest AQI and describe the spread
#[must_use]
pub fn compare_locations(snapshots: &[LocationSnapshot]) -> LocationComparison {
    let mut scored: Vec<(&Location, f64)> = Vec::new();
    let mut unranked = Vec::new();
    for snapshot in snapshots {
        match snapshot.latest_aqi() {
            Some(aqi) => scored.push((&snapshot.location, aqi)),
            None => unranked.push(snapshot.location.clone()),
        }
    }
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    let ranking: Vec<RankedLocation> = scored
        .iter()
        .enumerate()
        .filter_map(|(i, (location, aqi))| {
            let band = Aqi::new(*aqi).ok()?.band();
            Some(RankedLocation {
                rank: i + 1,
                location_id: location.id,
                name: location.name.clone(),
                aqi: *aqi,
                band,
            })
        })
        .collect();

    let stats = stats_of(&ranking);
    let insight = match (ranking.first(), ranking.last(), stats) {
        (Some(best), Some(worst), Some(stats)) if ranking.len() >= 2 => {
            Some(insight_text(&best.name, &worst.name, stats))
        },
        _ => None,
    };

    LocationComparison {
        ranking,
        unranked,
        stats,
        insight,
    }
}

#[allow(clippy::cast_precision_loss)]
fn stats_of(ranking: &[RankedLocation]) -> Option<ComparisonStats> {
    let min = ranking.first()?.aqi;
    let max = ranking.last()?.aqi;
    let average = ranking.iter().map(|r| r.aqi).sum::<f64>() / ranking.len() as f64;
    Some(ComparisonStats {
        min,
        max,
        average,
        spread: max - min,
    })
}

fn insight_text(best: &str, worst: &str, stats: ComparisonStats) -> String {
    let difference = stats.spread;
    if difference > 100.0 {
        format!(
            "Major air quality difference: {worst} has significantly worse air quality than {best} ({difference:.0} AQI points difference)"
        )
    } else if difference > 50.0 {
        format!(
            "Moderate air quality variation: {best} has better air quality than {worst} by {difference:.0} AQI points"
        )
    } else {
        format!(
            "Similar air quality across selected areas with average AQI of {:.0}",
            stats.average
        )
    }
}

/// AQI statistics for one UTC day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    /// Calendar day (UTC)
    pub date: NaiveDate,
    /// Mean AQI rounded to a whole number
    pub average: u32,
    /// Lowest AQI of the day
    pub min: f64,
    /// Highest AQI of the day
    pub max: f64,
    /// Number of readings
    pub readings: usize,
}

/// Per-day AQI statistics over the `days` days ending `today`
///
/// Oldest day first. Days without readings are omitted, as are readings
/// whose stored AQI is invalid.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn daily_summaries(
    readings: &[AirQualityReading],
    days: u32,
    today: NaiveDate,
) -> Vec<DailySummary> {
    if days == 0 {
        return Vec::new();
    }
    let first_day = today
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(NaiveDate::MIN);

    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for reading in readings {
        let Ok(aqi) = reading.validated_aqi() else {
            continue;
        };
        let date = reading.recorded_at.date_naive();
        if date >= first_day && date <= today {
            by_day.entry(date).or_default().push(aqi.value());
        }
    }

    by_day
        .into_iter()
        .map(|(date, values)| {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            DailySummary {
                date,
                average: mean.round() as u32,
                min,
                max,
                readings: values.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{GeoLocation, PollutantLevels};
    use chrono::{TimeZone, Utc};

    fn location(id: i64, name: &str) -> Location {
        Location::new(
            LocationId::new(id),
            name,
            GeoLocation::new(12.9, 77.6).unwrap(),
        )
    }

    fn reading_at(location_id: i64, aqi: f64, day: u32, hour: u32) -> AirQualityReading {
        AirQualityReading {
            id: 0,
            location_id: LocationId::new(location_id),
            aqi,
            pollutants: PollutantLevels::default(),
            recorded_at: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
        }
    }

    fn snapshot(id: i64, name: &str, aqi: Option<f64>) -> LocationSnapshot {
        LocationSnapshot {
            location: location(id, name),
            latest: aqi.map(|v| reading_at(id, v, 10, 12)),
        }
    }

    #[test]
    fn ranking_is_cleanest_first() {
        let comparison = compare_locations(&[
            snapshot(1, "Whitefield", Some(120.0)),
            snapshot(2, "Jayanagar", Some(45.0)),
            snapshot(3, "MG Road", Some(80.0)),
        ]);
        let names: Vec<_> = comparison.ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Jayanagar", "MG Road", "Whitefield"]);
        assert_eq!(comparison.ranking[0].rank, 1);
        assert_eq!(comparison.ranking[2].rank, 3);
        assert_eq!(comparison.ranking[0].band, AqiBand::Good);
    }

    #[test]
    fn locations_without_readings_are_unranked() {
        let comparison = compare_locations(&[
            snapshot(1, "Whitefield", Some(60.0)),
            snapshot(2, "Koramangala", None),
            snapshot(3, "Broken", Some(-1.0)),
        ]);
        assert_eq!(comparison.ranking.len(), 1);
        assert_eq!(comparison.unranked.len(), 2);
        assert!(comparison.insight.is_none());
    }

    #[test]
    fn stats() {
        let comparison = compare_locations(&[
            snapshot(1, "A", Some(40.0)),
            snapshot(2, "B", Some(60.0)),
            snapshot(3, "C", Some(80.0)),
        ]);
        let stats = comparison.stats.unwrap();
        assert!((stats.min - 40.0).abs() < f64::EPSILON);
        assert!((stats.max - 80.0).abs() < f64::EPSILON);
        assert!((stats.average - 60.0).abs() < f64::EPSILON);
        assert!((stats.spread - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn major_difference_insight() {
        let comparison = compare_locations(&[
            snapshot(1, "Whitefield", Some(190.0)),
            snapshot(2, "Jayanagar", Some(40.0)),
        ]);
        assert_eq!(
            comparison.insight.as_deref(),
            Some(
                "Major air quality difference: Whitefield has significantly worse air quality than Jayanagar (150 AQI points difference)"
            )
        );
    }

    #[test]
    fn moderate_variation_insight() {
        let comparison = compare_locations(&[
            snapshot(1, "A", Some(100.0)),
            snapshot(2, "B", Some(40.0)),
        ]);
        assert_eq!(
            comparison.insight.as_deref(),
            Some("Moderate air quality variation: B has better air quality than A by 60 AQI points")
        );
    }

    #[test]
    fn similar_insight_reports_average() {
        let comparison = compare_locations(&[
            snapshot(1, "A", Some(50.0)),
            snapshot(2, "B", Some(70.0)),
        ]);
        assert_eq!(
            comparison.insight.as_deref(),
            Some("Similar air quality across selected areas with average AQI of 60")
        );
    }

    #[test]
    fn empty_comparison() {
        let comparison = compare_locations(&[]);
        assert!(comparison.ranking.is_empty());
        assert!(comparison.stats.is_none());
        assert!(comparison.insight.is_none());
    }

    #[test]
    fn daily_summaries_group_by_utc_day() {
        let readings = vec![
            reading_at(1, 40.0, 9, 1),
            reading_at(1, 61.0, 9, 23),
            reading_at(1, 100.0, 10, 5),
            reading_at(1, 300.0, 1, 5),
            reading_at(1, -2.0, 10, 6),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let summaries = daily_summaries(&readings, 7, today);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(summaries[0].average, 51);
        assert!((summaries[0].min - 40.0).abs() < f64::EPSILON);
        assert!((summaries[0].max - 61.0).abs() < f64::EPSILON);
        assert_eq!(summaries[0].readings, 2);
        assert_eq!(summaries[1].readings, 1);
    }

    #[test]
    fn window_includes_first_day() {
        let readings = vec![reading_at(1, 10.0, 4, 0), reading_at(1, 10.0, 3, 23)];
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let summaries = daily_summaries(&readings, 7, today);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn zero_days_is_empty() {
        let readings = vec![reading_at(1, 10.0, 10, 0)];
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(daily_summaries(&readings, 0, today).is_empty());
    }
}
