//! Error types for histogram construction, recording and summaries.

use thiserror::Error;

/// Histogram error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HistogramError {
    /// `limit + 1` buckets cannot be addressed or allocated.
    #[error("Histogram limit {0} too large: limit + 1 buckets cannot be allocated")]
    LimitTooLarge(u64),

    /// Observation above the inclusive limit.
    #[error("Observation {value} out of range: limit is {limit}")]
    OutOfRange {
        /// Rejected observation.
        value: u64,
        /// Inclusive upper bound of the histogram.
        limit: u64,
    },

    /// Requested percentile outside [0, 100].
    #[error("Invalid percentile {0}: must be in range [0, 100]")]
    InvalidPercentile(f64),
}
