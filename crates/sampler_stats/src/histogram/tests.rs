//! Unit tests for the concurrent histogram.
//!
//! This module contains tests verifying:
//! - Exact mean and percentile values on known inputs
//! - Bessel-corrected standard deviation
//! - Range rejection at the inclusive limit
//! - Reset returning to a state indistinguishable from a fresh histogram
//! - Lock-free recording under concurrent producers

use super::*;
use proptest::prelude::*;
use std::thread;

fn filled(limit: u64, values: impl IntoIterator<Item = u64>) -> ConcurrentHistogram {
    let histogram = ConcurrentHistogram::new(limit);
    for v in values {
        assert!(histogram.record(v));
    }
    histogram
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_is_empty() {
    let histogram = ConcurrentHistogram::new(100);
    assert_eq!(histogram.limit(), 100);
    assert_eq!(histogram.count(), 0);
    assert_eq!(histogram.populated(), 0);
    assert_eq!(histogram.min(), None);
    assert_eq!(histogram.max(), None);
    assert_eq!(histogram.mean(), 0.0);
    assert_eq!(histogram.stddev(0.0), 0.0);
    assert_eq!(histogram.percentile(50.0), 0);
}

#[test]
fn test_zero_limit_has_one_bucket() {
    let histogram = ConcurrentHistogram::new(0);
    assert!(histogram.record(0));
    assert!(!histogram.record(1));
    assert_eq!(histogram.bucket(0), Some(1));
    assert_eq!(histogram.bucket(1), None);
}

#[test]
fn test_try_new_rejects_unaddressable_limit() {
    assert_eq!(
        ConcurrentHistogram::try_new(u64::MAX).unwrap_err(),
        HistogramError::LimitTooLarge(u64::MAX)
    );
}

#[test]
fn test_try_new_rejects_oversized_allocation() {
    // Addressable as usize, but limit + 1 counters exceed isize::MAX bytes.
    let limit = u64::MAX / 2;
    assert_eq!(
        ConcurrentHistogram::try_new(limit).unwrap_err(),
        HistogramError::LimitTooLarge(limit)
    );
}

#[test]
#[should_panic(expected = "too large")]
fn test_new_panics_on_unaddressable_limit() {
    let _ = ConcurrentHistogram::new(u64::MAX);
}

// ============================================================================
// Exact scenarios
// ============================================================================

#[test]
fn test_percentiles_of_one_to_ninety_nine() {
    let histogram = filled(100, 1..100);

    assert_eq!(histogram.mean(), 50.0);
    assert_eq!(histogram.percentile(10.0), 10);
    assert_eq!(histogram.percentile(25.0), 25);
    assert_eq!(histogram.percentile(50.0), 50);
    assert_eq!(histogram.percentile(75.0), 75);
    assert_eq!(histogram.percentile(90.0), 90);
    assert_eq!(histogram.percentile(95.0), 95);
}

#[test]
fn test_percentile_extremes() {
    let histogram = filled(100, 1..100);

    assert_eq!(histogram.percentile(0.0), 1);
    // Rank is capped at the count, so p = 100 lands on the maximum.
    assert_eq!(histogram.percentile(100.0), 99);
}

#[test]
fn test_small_scenario() {
    let histogram = filled(100, [20, 30, 40]);

    let mean = histogram.mean();
    assert_eq!(mean, 30.0);
    assert_eq!(histogram.stddev(mean), 10.0);
    assert_eq!(histogram.percentile(50.0), 30);
}

#[test]
fn test_mean_stddev_sequence() {
    let histogram = ConcurrentHistogram::new(100);
    assert_eq!(histogram.mean(), 0.0);
    assert_eq!(histogram.stddev(histogram.mean()), 0.0);

    histogram.record(10);
    assert_eq!(histogram.mean(), 10.0);
    assert_eq!(histogram.stddev(histogram.mean()), 0.0);

    histogram.record(20);
    histogram.record(30);
    assert_eq!(histogram.mean(), 20.0);
    assert_eq!(histogram.stddev(histogram.mean()), 10.0);

    histogram.reset();
    histogram.record(25);
    histogram.record(50);
    histogram.record(75);
    assert_eq!(histogram.percentile(50.0), 50);
    assert_eq!(histogram.mean(), 50.0);
    assert_eq!(histogram.stddev(histogram.mean()), 25.0);
}

#[test]
fn test_stddev_uses_supplied_mean() {
    let histogram = filled(100, [20, 30, 40]);
    // Around 20: deviations 0, 10, 20 -> sqrt(500 / 2).
    assert_eq!(histogram.stddev(20.0), 250.0f64.sqrt());
}

#[test]
fn test_repeated_values() {
    let histogram = filled(10, [3, 3, 3, 7]);

    assert_eq!(histogram.count(), 4);
    assert_eq!(histogram.populated(), 2);
    assert_eq!(histogram.bucket(3), Some(3));
    assert_eq!(histogram.mean(), 4.0);
    assert_eq!(histogram.percentile(50.0), 3);
    assert_eq!(histogram.percentile(80.0), 7);
}

// ============================================================================
// Range rejection
// ============================================================================

#[test]
fn test_boundary_rejection() {
    let histogram = ConcurrentHistogram::new(100);

    assert!(!histogram.record(101));
    assert_eq!(histogram.count(), 0);
    assert_eq!(histogram.min(), None);

    assert!(histogram.record(100));
    assert_eq!(histogram.count(), 1);
    assert_eq!(histogram.max(), Some(100));
}

#[test]
fn test_try_record() {
    let histogram = ConcurrentHistogram::new(100);

    assert_eq!(histogram.try_record(100), Ok(()));
    assert_eq!(
        histogram.try_record(u64::MAX),
        Err(HistogramError::OutOfRange {
            value: u64::MAX,
            limit: 100
        })
    );
    assert_eq!(histogram.count(), 1);
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_matches_fresh_histogram() {
    let histogram = filled(100, [0, 5, 100, 42, 42]);
    histogram.reset();

    assert_eq!(histogram.count(), 0);
    assert_eq!(histogram.populated(), 0);
    assert_eq!(histogram.min(), None);
    assert_eq!(histogram.max(), None);
    assert_eq!(histogram.mean(), 0.0);
    assert_eq!(histogram.stddev(0.0), 0.0);
    assert!((0..=100).all(|v| histogram.bucket(v) == Some(0)));

    let fresh = ConcurrentHistogram::new(100);
    for v in [20, 30, 40] {
        histogram.record(v);
        fresh.record(v);
    }
    let config = SummaryConfig::default();
    assert_eq!(histogram.summary(&config), fresh.summary(&config));
}

#[test]
fn test_reset_mut() {
    let mut histogram = filled(50, [1, 2, 3]);
    histogram.reset_mut();
    assert_eq!(histogram.count(), 0);
    assert_eq!(histogram.min(), None);

    assert!(histogram.record(9));
    assert_eq!(histogram.min(), Some(9));
    assert_eq!(histogram.max(), Some(9));
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_summary() {
    let histogram = filled(100, 1..100);
    let config = SummaryConfig::builder()
        .percentiles([10.0, 50.0, 90.0])
        .build()
        .unwrap();

    let summary = histogram.summary(&config);
    assert_eq!(summary.count, 99);
    assert_eq!(summary.populated, 99);
    assert_eq!(summary.min, Some(1));
    assert_eq!(summary.max, Some(99));
    assert_eq!(summary.mean, 50.0);
    assert_eq!(summary.percentiles, vec![(10.0, 10), (50.0, 50), (90.0, 90)]);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_producers_exact_totals() {
    let producers = 8u64;
    let per_producer = 10_000u64;
    let histogram = ConcurrentHistogram::new(1_000);

    thread::scope(|scope| {
        for p in 0..producers {
            let histogram = &histogram;
            scope.spawn(move || {
                for i in 0..per_producer {
                    assert!(histogram.record((p * 7 + i) % 1_001));
                }
            });
        }
    });

    assert_eq!(histogram.count(), producers * per_producer);
    let bucket_sum: u64 = (0..=1_000).filter_map(|v| histogram.bucket(v)).sum();
    assert_eq!(bucket_sum, producers * per_producer);
    assert_eq!(histogram.populated(), 1_001);
    assert_eq!(histogram.min(), Some(0));
    assert_eq!(histogram.max(), Some(1_000));
}

#[test]
fn test_concurrent_extrema() {
    let histogram = ConcurrentHistogram::new(10_000);

    thread::scope(|scope| {
        for t in 0..4u64 {
            let histogram = &histogram;
            scope.spawn(move || {
                // Disjoint bands walked outward: threads race on both extremes,
                // thread 3 ends on 1 and 9_000.
                for i in 0..1_000u64 {
                    histogram.record(4_000 - t * 1_000 - i);
                    histogram.record(5_001 + t * 1_000 + i);
                }
            });
        }
    });

    assert_eq!(histogram.count(), 8_000);
    assert_eq!(histogram.populated(), 8_000);
    assert_eq!(histogram.min(), Some(1));
    assert_eq!(histogram.max(), Some(9_000));
}

#[test]
fn test_record_par() {
    let histogram = ConcurrentHistogram::new(100);
    let values: Vec<u64> = (0..10_000).map(|i| i % 150).collect();

    let accepted = histogram.record_par(&values);

    let expected = values.iter().filter(|&&v| v <= 100).count();
    assert_eq!(accepted, expected);
    assert_eq!(histogram.count(), expected as u64);
    assert_eq!(histogram.populated(), 101);
}

#[test]
fn test_histogram_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ConcurrentHistogram>();
}

// ============================================================================
// Rounding
// ============================================================================

#[test]
fn test_round_half_up() {
    assert_eq!(round_half_up(0.5), 1.0);
    assert_eq!(round_half_up(2.0), 2.0);
    assert_eq!(round_half_up(2.4999), 2.0);
    assert_eq!(round_half_up(10.4), 10.0);
    assert_eq!(round_half_up(0.49999999999999994), 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Aggregates always agree with a naive recomputation.
    #[test]
    fn prop_matches_naive_statistics(values in prop::collection::vec(0u64..500, 1..300)) {
        let histogram = ConcurrentHistogram::new(499);
        for &v in &values {
            prop_assert!(histogram.record(v));
        }

        let n = values.len() as f64;
        let naive_mean = values.iter().sum::<u64>() as f64 / n;
        prop_assert!((histogram.mean() - naive_mean).abs() < 1e-9);

        let mut distinct = values.clone();
        distinct.sort_unstable();
        prop_assert_eq!(histogram.min(), distinct.first().copied());
        prop_assert_eq!(histogram.max(), distinct.last().copied());
        distinct.dedup();
        prop_assert_eq!(histogram.populated(), distinct.len() as u64);

        if values.len() >= 2 {
            let naive_var = values
                .iter()
                .map(|&v| (v as f64 - naive_mean).powi(2))
                .sum::<f64>() / (n - 1.0);
            prop_assert!((histogram.stddev(naive_mean) - naive_var.sqrt()).abs() < 1e-6);
        }
    }

    /// Percentiles are recorded values and monotone in p.
    #[test]
    fn prop_percentiles_monotone(values in prop::collection::vec(0u64..200, 1..200)) {
        let histogram = ConcurrentHistogram::new(199);
        for &v in &values {
            histogram.record(v);
        }

        let mut previous = 0u64;
        for p in (0..=100).map(f64::from) {
            let q = histogram.percentile(p);
            prop_assert!(values.contains(&q), "percentile {} = {} not recorded", p, q);
            prop_assert!(q >= previous);
            previous = q;
        }
    }
}
