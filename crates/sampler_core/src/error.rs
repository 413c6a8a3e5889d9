//! Error types for sampler construction.

use thiserror::Error;

/// Sampler parameter error.
///
/// Only returned by the checked `try_new` constructors. The plain `new`
/// constructors leave parameter validity to the caller.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SamplerError {
    /// Mean is NaN or infinite.
    #[error("Invalid mean {0}: must be finite")]
    NonFiniteMean(f64),

    /// Standard deviation is negative, NaN or infinite.
    #[error("Invalid standard deviation {0}: must be finite and non-negative")]
    InvalidStdDev(f64),

    /// Poisson rate is negative, NaN or infinite.
    #[error("Invalid Poisson rate {0}: must be finite and non-negative")]
    InvalidRate(f64),
}
