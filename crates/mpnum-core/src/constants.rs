//! Precision, exponent, and approximation constants.

/// Smallest precision, in bits, a float or context may carry.
pub const PREC_MIN: u32 = 1;

/// Largest precision, in bits, a float or context may carry.
pub const PREC_MAX: u32 = (i32::MAX as u32) - 256;

/// Precision of a fresh context (that of an IEEE 754 double).
pub const DEFAULT_PRECISION: u32 = 53;

/// Largest accepted `emax`.
pub const EMAX_MAX: i64 = (1 << 30) - 1;

/// Smallest accepted `emin`.
pub const EMIN_MIN: i64 = 1 - (1 << 30);

/// `emax` of a fresh context.
pub const DEFAULT_EMAX: i64 = EMAX_MAX;

/// `emin` of a fresh context.
pub const DEFAULT_EMIN: i64 = EMIN_MIN;

/// Floor of the working precision used for approximation error metrics.
pub const APPROX_MIN_WORKING_PREC: u32 = 20;

/// Guard bits added on top of `log2(1/ε)` for approximation error metrics.
pub const APPROX_GUARD_BITS: u32 = 8;

/// Smallest `n` accepted for a `2^-n` approximation bound.
pub const APPROX_MIN_BITS: u32 = 2;

/// Precision of an `f64` significand.
pub const F64_PRECISION: u32 = 53;

/// Clamp a requested precision into `[PREC_MIN, PREC_MAX]`.
#[must_use]
pub fn clamp_precision(prec: u32) -> u32 {
    prec.clamp(PREC_MIN, PREC_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponent_bounds_are_symmetric() {
        assert_eq!(EMIN_MIN, -EMAX_MAX);
    }

    #[test]
    fn bounds_lie_inside_mpfr_range() {
        assert!(i64::from(rug::float::exp_min()) <= EMIN_MIN);
        assert!(i64::from(rug::float::exp_max()) >= EMAX_MAX);
        assert!(rug::float::prec_max() >= PREC_MAX);
    }

    #[test]
    fn clamp_precision_bounds() {
        assert_eq!(clamp_precision(0), PREC_MIN);
        assert_eq!(clamp_precision(u32::MAX), PREC_MAX);
        assert_eq!(clamp_precision(64), 64);
    }
}
