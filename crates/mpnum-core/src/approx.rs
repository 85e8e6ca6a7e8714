//! Minimal-denominator rational approximation of a float.
//!
//! The continued fraction of `|x|` is expanded on an exact rational
//! remainder. Each convergent is checked against the relative error bound
//! with an error metric rounded up at a small working precision, widened to
//! the precision of the bound when needed, so a fraction is accepted exactly
//! when it honors the bound. The first
//! convergent inside the bound is then narrowed to the smallest semiconvergent
//! inside it, which is the first Stern-Brocot node inside the interval and so
//! the fraction of least denominator.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use mpnum_memory::PooledValue;

use crate::cache::{acquire, release};
use crate::constants::{APPROX_GUARD_BITS, APPROX_MIN_BITS, APPROX_MIN_WORKING_PREC};
use crate::context::{Context, ContextError};
use crate::float::BigFloat;
use crate::round::Round;

/// Relative error bound of an approximation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Tolerance {
    /// `2^-prec(x)`.
    #[default]
    Precision,
    /// `2^e` for a negative `e` with `2 <= -e <= prec(x)`.
    Exponent(i64),
    /// An explicit positive bound.
    Relative(BigFloat),
}

impl Tolerance {
    /// Map a host request: `0` means [`Tolerance::Precision`], a negative
    /// value `e` means `2^floor(e)`, a positive value is the bound itself.
    pub fn from_f64(requested: f64) -> Result<Self, ApproxError> {
        if !requested.is_finite() {
            return Err(ApproxError::InvalidTolerance);
        }
        if requested == 0.0 {
            Ok(Tolerance::Precision)
        } else if requested < 0.0 {
            #[allow(clippy::cast_possible_truncation)]
            let exponent = requested.floor().max(i64::MIN as f64) as i64;
            Ok(Tolerance::Exponent(exponent))
        } else {
            Ok(Tolerance::Relative(BigFloat::from_f64(requested)))
        }
    }
}

/// Result of [`best_rational`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Approximation {
    /// Returned instead of a unit-denominator ratio when integers are preferred.
    Integer(BigInt),
    Ratio(BigRational),
}

impl Approximation {
    #[must_use]
    pub fn numer(&self) -> &BigInt {
        match self {
            Approximation::Integer(n) => n,
            Approximation::Ratio(r) => r.numer(),
        }
    }

    #[must_use]
    pub fn denom(&self) -> BigInt {
        match self {
            Approximation::Integer(_) => BigInt::one(),
            Approximation::Ratio(r) => r.denom().clone(),
        }
    }

    #[must_use]
    pub fn to_rational(&self) -> BigRational {
        match self {
            Approximation::Integer(n) => BigRational::from_integer(n.clone()),
            Approximation::Ratio(r) => r.clone(),
        }
    }
}

impl fmt::Display for Approximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Approximation::Integer(n) => write!(f, "{n}"),
            Approximation::Ratio(r) => write!(f, "{}/{}", r.numer(), r.denom()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApproxError {
    #[error("cannot approximate a NaN or infinite value")]
    NonFinite,

    #[error("error bound 2^{exponent} is outside 2^-{precision}..=2^-2")]
    ExponentRange { exponent: i64, precision: u32 },

    #[error("error bound must be positive and finite")]
    InvalidTolerance,

    #[error(transparent)]
    Context(#[from] ContextError),
}

/// The bound and the working precision of the error metric.
///
/// The working precision is never below the precision of the bound, so the
/// bound is exact at it and an error rounded up compares against the bound
/// exactly.
fn resolve(x: &BigFloat, tolerance: &Tolerance) -> Result<(BigFloat, u32), ApproxError> {
    let prec = x.prec();
    let (bits, exact_exp) = match tolerance {
        Tolerance::Precision => (prec, Some(-i64::from(prec))),
        Tolerance::Exponent(e) => {
            let range = i64::from(APPROX_MIN_BITS)..=i64::from(prec);
            if !range.contains(&e.saturating_neg()) {
                return Err(ApproxError::ExponentRange {
                    exponent: *e,
                    precision: prec,
                });
            }
            (u32::try_from(-e).unwrap_or(prec), Some(*e))
        }
        Tolerance::Relative(bound) => {
            if !bound.is_normal() || bound.is_sign_negative() {
                return Err(ApproxError::InvalidTolerance);
            }
            let exp = bound.exponent().unwrap_or(0);
            (u32::try_from((1 - exp).max(0)).unwrap_or(u32::MAX), None)
        }
    };
    let wp = bits
        .max(APPROX_MIN_WORKING_PREC)
        .saturating_add(APPROX_GUARD_BITS);
    match (exact_exp, tolerance) {
        (Some(e), _) => Ok((
            BigFloat::from_scaled(false, &One::one(), e, wp, Round::Down).0,
            wp,
        )),
        (None, Tolerance::Relative(bound)) => {
            let wp = wp.max(bound.prec());
            Ok((bound.with_prec(wp, Round::Down).0, wp))
        }
        (None, _) => Err(ApproxError::InvalidTolerance),
    }
}

/// Continued-fraction registers and error bookkeeping of one approximation.
///
/// Both chains hold the convergents `[k-2, k-1, k]`; the registers come from
/// the thread's integer cache and go back to it when the run finishes.
struct ApproximationState {
    num: [PooledValue<BigInt>; 3],
    den: [PooledValue<BigInt>; 3],
    /// `|x|` exactly.
    target: BigRational,
    /// Remainder whose floor is the next partial quotient.
    alpha: BigRational,
    error: BigFloat,
    eps: BigFloat,
    wp: u32,
    iterations: u32,
}

impl ApproximationState {
    fn new(target: BigRational, eps: BigFloat, wp: u32) -> Self {
        let mut num: [PooledValue<BigInt>; 3] = [acquire(), acquire(), acquire()];
        let mut den: [PooledValue<BigInt>; 3] = [acquire(), acquire(), acquire()];
        let a0 = target.floor().to_integer();
        num[0].set(BigInt::zero());
        num[1].set(BigInt::one());
        num[2].set(a0.clone());
        den[0].set(BigInt::one());
        den[1].set(BigInt::zero());
        den[2].set(BigInt::one());
        let alpha = &target - BigRational::from_integer(a0);
        let mut state = Self {
            num,
            den,
            target,
            alpha,
            error: BigFloat::infinity(false, wp),
            eps,
            wp,
            iterations: 0,
        };
        state.error = state.relative_error(&state.num[2], &state.den[2]);
        state
    }

    /// `|x - p/q| / |x|`, rounded up.
    fn relative_error(&self, p: &BigInt, q: &BigInt) -> BigFloat {
        let n = self.target.numer();
        let d = self.target.denom();
        let diff = (n * q - p * d).abs();
        let scale = n * q;
        BigFloat::with_ratio(&BigRational::new_raw(diff, scale), self.wp, Round::Up).0
    }

    fn within(&self, error: &BigFloat) -> bool {
        *error <= self.eps
    }

    fn semiconvergent(&self, t: &BigInt) -> (BigInt, BigInt) {
        (
            t * &*self.num[2] + &*self.num[1],
            t * &*self.den[2] + &*self.den[1],
        )
    }

    /// Smallest `t` in `[1, a]` whose semiconvergent lies within the bound.
    fn narrow(&self, a: &BigInt) -> BigInt {
        let mut lo = BigInt::one();
        let mut hi = a.clone();
        while lo < hi {
            let mid: BigInt = (&lo + &hi) >> 1u32;
            let (p, q) = self.semiconvergent(&mid);
            if self.within(&self.relative_error(&p, &q)) {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        hi
    }

    /// Write `t * chain[k] + chain[k-1]` into the `k-2` slot of both chains.
    fn extend(&mut self, t: &BigInt) {
        for chain in [&mut self.num, &mut self.den] {
            let [older, prev, last] = chain;
            (**older).clone_from(&**prev);
            **older += t * &**last;
        }
    }

    fn commit(&mut self) {
        self.num.rotate_left(1);
        self.den.rotate_left(1);
    }

    /// Run until the bound is met or a step stops improving.
    fn run(&mut self) {
        while !self.within(&self.error) && !self.alpha.is_zero() {
            self.iterations += 1;
            let inverse = self.alpha.recip();
            let a = inverse.floor().to_integer();
            self.alpha = inverse - BigRational::from_integer(a.clone());

            self.extend(&a);
            let error = self.relative_error(&self.num[0], &self.den[0]);
            tracing::trace!(iteration = self.iterations, quotient = %a, error = %error, "convergent");
            if self.within(&error) {
                let t = self.narrow(&a);
                if t != a {
                    self.extend(&t);
                    self.error = self.relative_error(&self.num[0], &self.den[0]);
                } else {
                    self.error = error;
                }
                self.commit();
                return;
            }
            if error >= self.error {
                // Not improving: keep the previous convergent.
                return;
            }
            self.error = error;
            self.commit();
        }
    }

    fn finish(self, negative: bool) -> (BigInt, BigInt, u32) {
        let Self {
            num,
            den,
            iterations,
            ..
        } = self;
        let mut p = BigInt::clone(&num[2]);
        let q = BigInt::clone(&den[2]);
        if negative {
            p = -p;
        }
        for register in num.into_iter().chain(den) {
            release(register);
        }
        (p, q, iterations)
    }
}

/// Rational of least denominator within a relative error bound of `x`.
///
/// Zero approximates to zero. NaN and infinities are rejected.
pub fn best_rational(
    x: &BigFloat,
    tolerance: &Tolerance,
    prefer_integer: bool,
) -> Result<Approximation, ApproxError> {
    let exact = x.to_rational().ok_or(ApproxError::NonFinite)?;
    let (eps, wp) = resolve(x, tolerance)?;
    if exact.is_zero() {
        return Ok(if prefer_integer {
            Approximation::Integer(BigInt::zero())
        } else {
            Approximation::Ratio(BigRational::zero())
        });
    }

    let negative = exact.is_negative();
    let mut state = ApproximationState::new(exact.abs(), eps, wp);
    state.run();
    let (p, q, iterations) = state.finish(negative);
    tracing::debug!(
        iterations,
        working_precision = wp,
        denominator_bits = q.bits(),
        "rational approximation found"
    );
    Ok(if prefer_integer && q.is_one() {
        Approximation::Integer(p)
    } else {
        Approximation::Ratio(BigRational::new(p, q))
    })
}

impl Context {
    /// Convert `x` into this context, then approximate it.
    ///
    /// With [`Tolerance::Precision`] the bound follows the context precision.
    pub fn best_rational_f64(
        &mut self,
        x: f64,
        tolerance: &Tolerance,
        prefer_integer: bool,
    ) -> Result<Approximation, ApproxError> {
        let value = self.from_f64(x)?;
        best_rational(&value, tolerance, prefer_integer)
    }
}
