//! Histogram summary configuration and result types.
//!
//! [`SummaryConfig`] selects which percentiles a
//! [`ConcurrentHistogram::summary`](crate::ConcurrentHistogram::summary) call
//! reports. Build it with [`SummaryConfig::builder`]; percentiles are
//! validated at build time.

use crate::error::HistogramError;

/// Percentiles reported when none are configured explicitly.
pub const DEFAULT_PERCENTILES: [f64; 5] = [50.0, 75.0, 90.0, 95.0, 99.0];

/// Summary configuration.
///
/// # Examples
///
/// ```rust
/// use sampler_stats::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .percentile(50.0)
///     .percentile(99.9)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.percentiles(), &[50.0, 99.9]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryConfig {
    percentiles: Vec<f64>,
}

impl SummaryConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder::default()
    }

    /// Returns the percentiles to report, in insertion order.
    #[inline]
    pub fn percentiles(&self) -> &[f64] {
        &self.percentiles
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::InvalidPercentile`] for the first
    /// percentile outside `[0, 100]` (NaN included).
    pub fn validate(&self) -> Result<(), HistogramError> {
        match self
            .percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            Some(&p) => Err(HistogramError::InvalidPercentile(p)),
            None => Ok(()),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            percentiles: DEFAULT_PERCENTILES.to_vec(),
        }
    }
}

/// Builder for [`SummaryConfig`].
///
/// With no percentile added, [`build`](Self::build) falls back to
/// [`DEFAULT_PERCENTILES`].
#[derive(Clone, Debug, Default)]
pub struct SummaryConfigBuilder {
    percentiles: Vec<f64>,
}

impl SummaryConfigBuilder {
    /// Adds one percentile in `[0, 100]`.
    #[inline]
    pub fn percentile(mut self, p: f64) -> Self {
        self.percentiles.push(p);
        self
    }

    /// Adds several percentiles.
    pub fn percentiles(mut self, ps: impl IntoIterator<Item = f64>) -> Self {
        self.percentiles.extend(ps);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HistogramError::InvalidPercentile`] if any percentile lies
    /// outside `[0, 100]`.
    pub fn build(self) -> Result<SummaryConfig, HistogramError> {
        let config = if self.percentiles.is_empty() {
            SummaryConfig::default()
        } else {
            SummaryConfig {
                percentiles: self.percentiles,
            }
        };

        config.validate()?;
        Ok(config)
    }
}

/// Snapshot of a histogram's derived statistics.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramSummary {
    /// Number of recorded observations.
    pub count: u64,
    /// Number of distinct values recorded.
    pub populated: u64,
    /// Smallest recorded value.
    pub min: Option<u64>,
    /// Largest recorded value.
    pub max: Option<u64>,
    /// Mean of the observations.
    pub mean: f64,
    /// Bessel-corrected sample standard deviation.
    pub stddev: f64,
    /// `(percentile, value)` pairs in configuration order.
    pub percentiles: Vec<(f64, u64)>,
}

impl HistogramSummary {
    /// Looks up the value reported for percentile `p`.
    pub fn percentile(&self, p: f64) -> Option<u64> {
        self.percentiles
            .iter()
            .find(|(q, _)| *q == p)
            .map(|&(_, v)| v)
    }
}
