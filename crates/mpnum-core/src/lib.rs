//! # mpnum-core
//!
//! Correctly rounded binary floating-point values, the numeric context that
//! governs them, and minimal-denominator rational approximation.
//!
//! Integer and rational values come from `num-bigint` and `num-rational`;
//! [`BigFloat`] wraps an MPFR float from `rug`. Every float-producing
//! operation goes through a [`Context`], which bounds the exponent, records
//! sticky flags and fires traps.

pub mod approx;
pub mod cache;
pub mod constants;
pub mod context;
pub mod float;
pub mod local;
pub mod round;

// Re-exports
pub use approx::{best_rational, Approximation, ApproxError, Tolerance};
pub use cache::{
    acquire, cache_stats, clear_cache, get_cache, release, set_cache, CacheStats, Cached,
    ValueCache,
};
pub use constants::{
    DEFAULT_EMAX, DEFAULT_EMIN, DEFAULT_PRECISION, EMAX_MAX, EMIN_MIN, PREC_MAX, PREC_MIN,
};
pub use context::{Condition, Conditions, Context, ContextError, ContextOverrides};
pub use float::BigFloat;
pub use local::{clear_flags, current_context, local_context, set_context, with_context, LocalContext};
pub use round::{ParseRoundError, Round};

/// Approximate `x` by the simplest fraction within `2^-prec(x)`.
///
/// # Example
/// ```
/// let x = mpnum_core::BigFloat::from_f64(0.75);
/// assert_eq!(mpnum_core::simplest_fraction(&x).unwrap().to_string(), "3/4");
/// ```
pub fn simplest_fraction(x: &BigFloat) -> Result<Approximation, ApproxError> {
    best_rational(x, &Tolerance::Precision, false)
}
