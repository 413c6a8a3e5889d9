//! Lock-free bounded histogram.
//!
//! [`ConcurrentHistogram`] keeps one `AtomicU64` counter per integer value in
//! `[0, limit]`, plus atomic aggregates (total count, populated bucket count,
//! running minimum and maximum). Recording never blocks: counters use
//! `fetch_add` and the extrema use compare-and-swap retry loops that only
//! write when the new value strictly improves the current extreme.
//!
//! # Memory Layout
//!
//! `limit + 1` counters of 8 bytes each, allocated once at construction.
//! A histogram over `[0, 60_000]` (one minute of millisecond latencies)
//! occupies about 470 KB.
//!
//! # Reading
//!
//! Derived statistics walk the buckets between the recorded minimum and
//! maximum. They are only meaningful at a quiescent point: join every
//! producer before reading or resetting.

use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::HistogramError;
use crate::summary::{HistogramSummary, SummaryConfig};

/// Sentinel stored in `min` while the histogram is empty.
const EMPTY_MIN: u64 = u64::MAX;

/// Concurrent histogram over the integers `0..=limit`.
///
/// # Thread Safety
///
/// `ConcurrentHistogram` is `Send + Sync`. Share it by reference (or `Arc`)
/// and call [`record`](Self::record) from any number of threads.
///
/// # Examples
///
/// ```rust
/// use sampler_stats::ConcurrentHistogram;
///
/// let histogram = ConcurrentHistogram::new(100);
/// for v in [20, 30, 40] {
///     assert!(histogram.record(v));
/// }
/// assert!(!histogram.record(101));
///
/// let mean = histogram.mean();
/// assert_eq!(mean, 30.0);
/// assert_eq!(histogram.stddev(mean), 10.0);
/// assert_eq!(histogram.percentile(50.0), 30);
/// ```
#[derive(Debug)]
pub struct ConcurrentHistogram {
    /// `buckets[i]` counts observations equal to `i`.
    buckets: Box<[AtomicU64]>,
    /// Inclusive upper bound.
    limit: u64,
    total: AtomicU64,
    /// Buckets with a nonzero count.
    populated: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl ConcurrentHistogram {
    /// Creates an empty histogram accepting values in `0..=limit`.
    ///
    /// # Panics
    ///
    /// Panics if the `limit + 1` buckets cannot be allocated. Use
    /// [`ConcurrentHistogram::try_new`] to handle that case.
    pub fn new(limit: u64) -> Self {
        Self::try_new(limit).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates an empty histogram accepting values in `0..=limit`.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::LimitTooLarge`] if `limit + 1` buckets
    /// cannot be indexed with `usize` or the allocation fails.
    pub fn try_new(limit: u64) -> Result<Self, HistogramError> {
        let len = usize::try_from(limit)
            .ok()
            .and_then(|l| l.checked_add(1))
            .ok_or(HistogramError::LimitTooLarge(limit))?;

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(len)
            .map_err(|_| HistogramError::LimitTooLarge(limit))?;
        buckets.resize_with(len, || AtomicU64::new(0));
        let buckets = buckets.into_boxed_slice();
        debug!(limit, buckets = len, "histogram allocated");

        Ok(Self {
            buckets,
            limit,
            total: AtomicU64::new(0),
            populated: AtomicU64::new(0),
            min: AtomicU64::new(EMPTY_MIN),
            max: AtomicU64::new(0),
        })
    }

    /// Returns the inclusive upper bound.
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns the number of recorded observations.
    #[inline]
    pub fn count(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Returns the number of distinct values recorded.
    #[inline]
    pub fn populated(&self) -> u64 {
        self.populated.load(Ordering::Relaxed)
    }

    /// Returns the smallest recorded value, or `None` when empty.
    pub fn min(&self) -> Option<u64> {
        self.recorded_range().map(|r| *r.start() as u64)
    }

    /// Returns the largest recorded value, or `None` when empty.
    pub fn max(&self) -> Option<u64> {
        self.recorded_range().map(|r| *r.end() as u64)
    }

    /// Returns the count for `value`, or `None` if it is above the limit.
    pub fn bucket(&self, value: u64) -> Option<u64> {
        let index = usize::try_from(value).ok()?;
        self.buckets
            .get(index)
            .map(|b| b.load(Ordering::Relaxed))
    }

    /// Records one observation.
    ///
    /// Returns `false` without touching any counter when `value > limit`.
    /// Values are never clamped.
    pub fn record(&self, value: u64) -> bool {
        if value > self.limit {
            trace!(value, limit = self.limit, "observation rejected");
            return false;
        }

        // Lossless: value <= limit and limit + 1 fits in usize.
        let index = value as usize;
        if self.buckets[index].fetch_add(1, Ordering::Relaxed) == 0 {
            self.populated.fetch_add(1, Ordering::Relaxed);
        }
        self.total.fetch_add(1, Ordering::Relaxed);

        let mut current = self.min.load(Ordering::Relaxed);
        while value < current {
            match self.min.compare_exchange_weak(
                current,
                value,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        let mut current = self.max.load(Ordering::Relaxed);
        while value > current {
            match self.max.compare_exchange_weak(
                current,
                value,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        true
    }

    /// Records one observation, reporting rejection as an error.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::OutOfRange`] when `value > limit`.
    pub fn try_record(&self, value: u64) -> Result<(), HistogramError> {
        if self.record(value) {
            Ok(())
        } else {
            Err(HistogramError::OutOfRange {
                value,
                limit: self.limit,
            })
        }
    }

    /// Records a batch of observations on the rayon thread pool.
    ///
    /// Returns how many were accepted. May run concurrently with other
    /// `record` calls.
    pub fn record_par(&self, values: &[u64]) -> usize {
        values.par_iter().filter(|&&v| self.record(v)).count()
    }

    /// Mean of the recorded observations; `0.0` when empty.
    ///
    /// Requires a quiescent point (no concurrent `record`).
    pub fn mean(&self) -> f64 {
        let total = self.count();
        if total == 0 {
            return 0.0;
        }
        let Some(range) = self.recorded_range() else {
            return 0.0;
        };

        let sum: u128 = range
            .map(|i| i as u128 * self.buckets[i].load(Ordering::Relaxed) as u128)
            .sum();
        sum as f64 / total as f64
    }

    /// Sample standard deviation (Bessel-corrected) around `mean`.
    ///
    /// `mean` is taken from the caller so a value computed once with
    /// [`mean`](Self::mean) can be reused. Returns `0.0` with fewer than two
    /// observations. Requires a quiescent point.
    pub fn stddev(&self, mean: f64) -> f64 {
        let total = self.count();
        if total < 2 {
            return 0.0;
        }
        let Some(range) = self.recorded_range() else {
            return 0.0;
        };

        let sum: f64 = range
            .filter_map(|i| {
                let count = self.buckets[i].load(Ordering::Relaxed);
                (count != 0).then(|| (i as f64 - mean).powi(2) * count as f64)
            })
            .sum();
        (sum / (total - 1) as f64).sqrt()
    }

    /// Nearest-rank percentile, `p` in `[0, 100]`.
    ///
    /// The target rank is `p / 100 * count + 0.5` rounded half-up, capped at
    /// `count`; the result is the smallest recorded value whose cumulative
    /// count reaches it. No interpolation. Returns `0` when empty.
    /// Requires a quiescent point.
    pub fn percentile(&self, p: f64) -> u64 {
        let total = self.count();
        let Some(range) = self.recorded_range() else {
            return 0;
        };

        let rank = (round_half_up(p / 100.0 * total as f64 + 0.5) as u64).min(total);

        let mut running = 0u64;
        for i in range {
            running += self.buckets[i].load(Ordering::Relaxed);
            if running >= rank {
                return i as u64;
            }
        }
        0
    }

    /// Computes count, extrema, mean, standard deviation and the configured
    /// percentiles.
    ///
    /// Requires a quiescent point.
    pub fn summary(&self, config: &SummaryConfig) -> HistogramSummary {
        let mean = self.mean();
        HistogramSummary {
            count: self.count(),
            populated: self.populated(),
            min: self.min(),
            max: self.max(),
            mean,
            stddev: self.stddev(mean),
            percentiles: config
                .percentiles()
                .iter()
                .map(|&p| (p, self.percentile(p)))
                .collect(),
        }
    }

    /// Clears every bucket and aggregate back to the empty state.
    ///
    /// Must not run concurrently with `record`; an interleaved observation
    /// may be partially cleared. Prefer [`reset_mut`](Self::reset_mut) when
    /// exclusive access is available.
    pub fn reset(&self) {
        for bucket in self.buckets.iter() {
            bucket.store(0, Ordering::Relaxed);
        }
        self.total.store(0, Ordering::Relaxed);
        self.populated.store(0, Ordering::Relaxed);
        self.min.store(EMPTY_MIN, Ordering::Relaxed);
        self.max.store(0, Ordering::Relaxed);
        debug!(limit = self.limit, "histogram reset");
    }

    /// Clears the histogram through exclusive access.
    pub fn reset_mut(&mut self) {
        for bucket in self.buckets.iter_mut() {
            *bucket.get_mut() = 0;
        }
        *self.total.get_mut() = 0;
        *self.populated.get_mut() = 0;
        *self.min.get_mut() = EMPTY_MIN;
        *self.max.get_mut() = 0;
        debug!(limit = self.limit, "histogram reset");
    }

    /// Bucket indices between the recorded extremes, `None` when empty.
    fn recorded_range(&self) -> Option<RangeInclusive<usize>> {
        let min = self.min.load(Ordering::Relaxed);
        let max = self.max.load(Ordering::Relaxed);
        if min > max {
            return None;
        }
        // Both are recorded values, hence <= limit.
        Some(min as usize..=max as usize)
    }
}

/// Rounds to the nearest integer, halves away from zero for positive input.
///
/// Splits into integer and fractional parts instead of `floor(x + 0.5)`,
/// which misrounds `0.49999999999999994`.
fn round_half_up(x: f64) -> f64 {
    let int = x.trunc();
    if x.fract() >= 0.5 {
        int + 1.0
    } else {
        int
    }
}

#[cfg(test)]
mod tests;
