//! Gaussian variates via the Box-Muller polar (Marsaglia) method.
//!
//! Each fresh draw consumes uniform pairs until one lands strictly inside
//! the unit disk (excluding the origin), then turns that point into two
//! independent standard normal deviates. The first is returned immediately
//! and the second is cached as a spare for the next call, which therefore
//! costs no uniform draws at all.
//!
//! # Algorithm Reference
//!
//! - Marsaglia, G. & Bray, T. A. (1964). "A Convenient Method for Generating
//!   Normal Variables". SIAM Review 6(3).

use tracing::debug;

use crate::error::SamplerError;
use crate::source::UniformSource;

/// Normal variate generator with configurable mean and standard deviation.
///
/// # Examples
///
/// ```rust
/// use sampler_core::{GaussianSampler, SeededSource};
///
/// let mut sampler = GaussianSampler::new(1.0, 0.005, SeededSource::from_seed(42));
/// let first = sampler.next_value();   // fresh pair, caches the spare
/// assert!(sampler.has_spare());
/// let second = sampler.next_value();  // consumes the spare
/// assert!(!sampler.has_spare());
/// assert!(first.is_finite() && second.is_finite());
/// ```
#[derive(Clone, Debug)]
pub struct GaussianSampler<S> {
    source: S,
    mean: f64,
    stddev: f64,
    /// Second deviate of the last accepted pair, standard-normal scale.
    spare: Option<f64>,
}

impl<S: UniformSource> GaussianSampler<S> {
    /// Creates a sampler drawing from `source`.
    ///
    /// Parameters are not validated: a negative or non-finite `stddev`
    /// produces meaningless output. Use [`GaussianSampler::try_new`] to
    /// reject such values.
    pub fn new(mean: f64, stddev: f64, source: S) -> Self {
        debug!(mean, stddev, "gaussian sampler created");
        Self {
            source,
            mean,
            stddev,
            spare: None,
        }
    }

    /// Creates a sampler after checking that `mean` is finite and `stddev`
    /// is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`SamplerError::NonFiniteMean`] or
    /// [`SamplerError::InvalidStdDev`].
    pub fn try_new(mean: f64, stddev: f64, source: S) -> Result<Self, SamplerError> {
        if !mean.is_finite() {
            return Err(SamplerError::NonFiniteMean(mean));
        }
        if !stddev.is_finite() || stddev < 0.0 {
            return Err(SamplerError::InvalidStdDev(stddev));
        }
        Ok(Self::new(mean, stddev, source))
    }

    /// Returns the configured mean.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the configured standard deviation.
    #[inline]
    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    /// Returns `true` when the next call will consume a cached spare.
    #[inline]
    pub fn has_spare(&self) -> bool {
        self.spare.is_some()
    }

    /// Mutable access to the underlying source.
    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the sampler and returns its source. Any cached spare is lost.
    #[inline]
    pub fn into_source(self) -> S {
        self.source
    }

    /// Draws the next normally-distributed value.
    ///
    /// The rejection loop has no iteration cap. Each attempt is accepted with
    /// probability pi/4, so nontermination requires a broken source.
    pub fn next_value(&mut self) -> f64 {
        if let Some(spare) = self.spare.take() {
            return self.mean + spare * self.stddev;
        }

        let (x1, x2, w) = loop {
            let x1 = 2.0 * self.source.next_uniform() - 1.0;
            let x2 = 2.0 * self.source.next_uniform() - 1.0;
            let w = x1 * x1 + x2 * x2;
            if w != 0.0 && w < 1.0 {
                break (x1, x2, w);
            }
        };

        let scale = ((-2.0 * w.ln()) / w).sqrt();
        self.spare = Some(x2 * scale);
        self.mean + x1 * scale * self.stddev
    }

    /// Fills the buffer with consecutive draws.
    ///
    /// Equivalent to calling [`GaussianSampler::next_value`] once per slot,
    /// so the spare carries across calls.
    pub fn fill(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = self.next_value();
        }
    }
}

/// Infinite stream of draws; `next` never returns `None`.
impl<S: UniformSource> Iterator for GaussianSampler<S> {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        Some(self.next_value())
    }
}
