//! Property-based tests for classification and recommendation lookup
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{
    AlertThresholds, AqiBand, Classification, DomainError, HealthAdvisory, HealthRecommendation,
    RecommendationTable, classify, classify_lenient, risk_flags,
    value_objects::{Aqi, BAND_UPPER_BOUNDS, Pollutant, PollutantLevels},
};
use proptest::prelude::*;

// ============================================================================
// Classifier Property Tests
// ============================================================================

mod classifier_tests {
    use super::*;

    proptest! {
        #[test]
        fn classify_is_total_over_valid_input(value in 0.0f64..1.0e9) {
            prop_assert!(classify(value).is_ok());
        }

        #[test]
        fn classify_is_deterministic(value in 0.0f64..1_000.0) {
            prop_assert_eq!(classify(value).unwrap(), classify(value).unwrap());
        }

        #[test]
        fn negative_input_is_rejected(value in -1.0e9f64..-0.000_001) {
            prop_assert!(matches!(classify(value), Err(DomainError::InvalidAqi(_))));
        }

        #[test]
        fn classify_is_monotonic(a in 0.0f64..1_000.0, b in 0.0f64..1_000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(low).unwrap() <= classify(high).unwrap());
        }

        #[test]
        fn value_is_within_its_band(value in 0.0f64..1_000.0) {
            let band = classify(value).unwrap();
            if let Some(upper) = band.upper_bound() {
                prop_assert!(value <= upper);
            }
            let lower = BAND_UPPER_BOUNDS
                .iter()
                .filter(|(_, b)| *b < band)
                .map(|(upper, _)| *upper)
                .fold(None, |acc: Option<f64>, u| Some(acc.map_or(u, |a| a.max(u))));
            if let Some(lower) = lower {
                prop_assert!(value > lower);
            }
        }

        #[test]
        fn lenient_agrees_with_strict(value in -100.0f64..1_000.0) {
            let lenient = classify_lenient(Some(value));
            match classify(value) {
                Ok(band) => prop_assert_eq!(lenient, Classification::Known(band)),
                Err(_) => prop_assert_eq!(lenient, Classification::Unknown),
            }
        }
    }

    #[test]
    fn boundary_values_belong_to_lower_band() {
        for (upper, band) in BAND_UPPER_BOUNDS {
            assert_eq!(classify(upper).unwrap(), band);
            assert!(classify(upper + 1.0).unwrap() > band);
        }
        assert_eq!(classify(301.0).unwrap(), AqiBand::Hazardous);
    }
}

// ============================================================================
// Risk Flag Property Tests
// ============================================================================

mod risk_flag_tests {
    use super::*;

    fn levels_strategy() -> impl Strategy<Value = PollutantLevels> {
        (
            proptest::option::of(0.0f64..500.0),
            proptest::option::of(0.0f64..500.0),
            proptest::option::of(0.0f64..500.0),
            proptest::option::of(0.0f64..500.0),
            proptest::option::of(0.0f64..500.0),
            proptest::option::of(0.0f64..50.0),
        )
            .prop_map(|(pm25, pm10, o3, no2, so2, co)| PollutantLevels {
                pm25,
                pm10,
                o3,
                no2,
                so2,
                co,
            })
    }

    proptest! {
        #[test]
        fn flag_iff_strictly_above_cutoff(levels in levels_strategy()) {
            let flags = risk_flags(&levels);
            for p in Pollutant::all() {
                let above = levels.get(p) > p.high_threshold();
                prop_assert_eq!(flags.contains(&p), above);
            }
        }

        #[test]
        fn checks_are_independent(levels in levels_strategy(), extra in 0.0f64..500.0) {
            let before = risk_flags(&levels);
            let after = risk_flags(&levels.with(Pollutant::Pm25, extra));
            for p in Pollutant::all().into_iter().filter(|p| *p != Pollutant::Pm25) {
                prop_assert_eq!(before.contains(&p), after.contains(&p));
            }
        }
    }
}

// ============================================================================
// Recommendation Table Property Tests
// ============================================================================

mod recommendation_tests {
    use super::*;

    proptest! {
        #[test]
        fn standard_table_resolves_every_whole_value_up_to_500(value in 0u32..=500) {
            let aqi = Aqi::new(f64::from(value)).unwrap();
            let record = RecommendationTable::standard().resolve(aqi).unwrap().clone();
            prop_assert!(record.contains(aqi));
        }

        #[test]
        fn values_above_bounded_top_are_not_found(value in 501u32..10_000) {
            let aqi = Aqi::new(f64::from(value)).unwrap();
            let table = RecommendationTable::standard();
            let result = table.resolve(aqi);
            prop_assert!(
                matches!(result, Err(DomainError::RecommendationNotFound { .. })),
                "expected RecommendationNotFound"
            );
        }

        #[test]
        fn resolve_returns_first_containing_record(
            ranges in proptest::collection::vec((0u32..300, 0u32..300), 1..8),
            value in 0u32..300
        ) {
            let records: Vec<HealthRecommendation> = ranges
                .iter()
                .enumerate()
                .map(|(i, (min, max))| HealthRecommendation::new(*min, *max, i.to_string(), ""))
                .collect();
            let table = RecommendationTable::new(records.clone());
            let aqi = Aqi::new(f64::from(value)).unwrap();

            let expected = records.iter().find(|r| r.contains(aqi));
            match (table.resolve(aqi), expected) {
                (Ok(found), Some(first)) => prop_assert_eq!(found, first),
                (Err(DomainError::RecommendationNotFound { .. }), None) => {},
                _ => prop_assert!(false, "resolve disagrees with linear scan"),
            }
        }

        #[test]
        fn contiguous_open_ended_tables_have_no_issues(
            widths in proptest::collection::vec(1u32..100, 1..8)
        ) {
            let mut records = Vec::new();
            let mut min = 0;
            for width in &widths {
                records.push(HealthRecommendation::new(min, min + width - 1, "", ""));
                min += width;
            }
            records.push(HealthRecommendation::open_ended(min, "", ""));
            prop_assert!(RecommendationTable::new(records).tiling_issues().is_empty());
        }

        #[test]
        fn advisory_never_fails(value in 0.0f64..5_000.0) {
            let aqi = Aqi::new(value).unwrap();
            let advisory = HealthAdvisory::build(
                aqi,
                &PollutantLevels::default(),
                &RecommendationTable::standard(),
                &AlertThresholds::default(),
            );
            prop_assert_eq!(advisory.band, aqi.band());
            prop_assert_eq!(advisory.fallback, value.round() > 500.0);
        }
    }
}
