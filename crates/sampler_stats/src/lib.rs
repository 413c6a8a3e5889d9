//! # Sampler Stats (Aggregation Layer)
//!
//! Lock-free aggregation of integer observations from many concurrent
//! producers into a bounded histogram, with mean, sample standard deviation
//! and nearest-rank percentiles computed from the accumulated counts.
//!
//! This crate is independent of `sampler_core`: any integer metric
//! (latencies in milliseconds, queue depths, Poisson draws) can be recorded.
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_stats::ConcurrentHistogram;
//! use std::thread;
//!
//! let histogram = ConcurrentHistogram::new(1_000);
//!
//! thread::scope(|scope| {
//!     for worker in 0..4u64 {
//!         let histogram = &histogram;
//!         scope.spawn(move || {
//!             for i in 0..250 {
//!                 histogram.record(worker * 250 + i);
//!             }
//!         });
//!     }
//! });
//!
//! // All producers joined: safe to read.
//! assert_eq!(histogram.count(), 1_000);
//! let mean = histogram.mean();
//! assert_eq!(mean, 499.5);
//! assert_eq!(histogram.percentile(50.0), 500);
//! ```
//!
//! ## Read Precondition
//!
//! `record` may run on any number of threads at once. `mean`, `stddev`,
//! `percentile`, `summary` and `reset` assume no `record` is in flight; join
//! the producers (or otherwise synchronise) before calling them.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod histogram;
pub mod summary;

pub use error::HistogramError;
pub use histogram::ConcurrentHistogram;
pub use summary::{HistogramSummary, SummaryConfig, SummaryConfigBuilder, DEFAULT_PERCENTILES};
