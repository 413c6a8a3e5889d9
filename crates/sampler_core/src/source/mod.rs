//! # Uniform Source Capability
//!
//! Every sampler in this crate consumes a [`UniformSource`]: anything able to
//! produce independent `f64` values uniformly distributed in `[0, 1)`.
//!
//! ## Module Structure
//!
//! - [`UniformSource`]: the capability trait
//! - [`SeededSource`]: reproducible `StdRng` adapter with seed tracking
//!
//! Forwarding impls for `&mut S` and `Box<S>` let a caller keep ownership of
//! a source while lending it to a sampler, or erase its type behind a box.
//!
//! ## Usage Example
//!
//! ```rust
//! use sampler_core::source::{SeededSource, UniformSource};
//!
//! let mut source = SeededSource::from_seed(12345);
//! let u = source.next_uniform();
//! assert!((0.0..1.0).contains(&u));
//! ```

mod seeded;

pub use seeded::SeededSource;

/// Capability producing independent uniform variates in `[0, 1)`.
///
/// Implementations must never return `1.0`. The samplers rely on the
/// half-open range: the Box-Muller rejection maps `u` to `2u - 1` and the
/// Atkinson proposal evaluates `ln((1 - u) / u)`.
pub trait UniformSource {
    /// Draws the next uniform value in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

impl<S: UniformSource + ?Sized> UniformSource for Box<S> {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}
