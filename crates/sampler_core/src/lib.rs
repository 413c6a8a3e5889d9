//! # Sampler Core (Sampling Layer)
//!
//! Pseudo-random variate generation over an injected uniform source.
//!
//! This crate provides:
//! - [`UniformSource`]: the `[0, 1)` uniform capability consumed by every sampler
//! - [`SeededSource`]: a reproducible adapter over `rand::rngs::StdRng`
//! - [`GaussianSampler`]: normal variates via the Box-Muller polar (Marsaglia) method
//! - [`PoissonSampler`]: Poisson variates via Knuth's exact method for small
//!   rates and Atkinson's rejection method for large rates
//!
//! ## Reproducibility
//!
//! There is no process-wide default generator. Every sampler takes its source
//! at construction, so a seeded source and a fixed call sequence always yield
//! the same output sequence. Callers that do not care about reproducibility
//! seed at the call site with [`SeededSource::from_entropy`].
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::{GaussianSampler, PoissonSampler, SeededSource};
//!
//! let mut latency = GaussianSampler::new(1.0, 0.005, SeededSource::from_seed(7));
//! let sample = latency.next_value();
//! assert!(sample.is_finite());
//!
//! let mut arrivals = PoissonSampler::new(4.0, SeededSource::from_seed(7));
//! let _events: u64 = arrivals.next_value();
//! ```
//!
//! ## Thread Safety
//!
//! Samplers draw through `&mut self`, so each instance belongs to exactly one
//! call sequence. Give each worker thread its own sampler (and source).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod gaussian;
pub mod poisson;
pub mod source;

pub use error::SamplerError;
pub use gaussian::GaussianSampler;
pub use poisson::{
    log_factorial, PoissonSampler, PoissonStrategy, ATKINSON_C, EXACT_RATE_THRESHOLD,
};
pub use source::{SeededSource, UniformSource};
