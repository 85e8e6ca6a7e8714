//! Binary floating-point values of arbitrary precision, backed by MPFR.
//!
//! A [`BigFloat`] wraps a [`rug::Float`]. A finite non-zero value of
//! precision `p` has a `p`-bit significand and an exponent `e` with the value
//! in `[2^(e-1), 2^e)`, the MPFR convention. Zeros are signed; NaN and the
//! infinities carry a precision but no digits.
//!
//! Constructions that may lose bits take a precision and a [`Round`] and
//! report the direction of the rounding as the `Ordering` of the result
//! against the exact value. Exponents are only bounded by MPFR's default
//! range here; the bounds of a [`Context`](crate::context::Context) are
//! applied by the context itself.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::Zero;
use rug::float::Special;
use rug::integer::Order;
use rug::{Assign, Float, Integer, Rational};

use crate::constants::{clamp_precision, F64_PRECISION};
use crate::round::Round;

/// Arbitrary-precision binary floating-point number.
#[derive(Debug, Clone)]
pub struct BigFloat(Float);

pub(crate) fn integer_to_rug(value: &BigInt) -> Integer {
    let magnitude = Integer::from_digits(&value.magnitude().to_u32_digits(), Order::Lsf);
    if value.sign() == Sign::Minus {
        -magnitude
    } else {
        magnitude
    }
}

pub(crate) fn integer_from_rug(value: &Integer) -> BigInt {
    let magnitude = BigUint::new(value.to_digits::<u32>(Order::Lsf));
    let sign = if value.cmp0() == Ordering::Less {
        Sign::Minus
    } else {
        Sign::Plus
    };
    BigInt::from_biguint(sign, magnitude)
}

pub(crate) fn rational_to_rug(value: &BigRational) -> Rational {
    Rational::from((integer_to_rug(value.numer()), integer_to_rug(value.denom())))
}

fn rational_from_rug(value: &Rational) -> BigRational {
    BigRational::new(integer_from_rug(value.numer()), integer_from_rug(value.denom()))
}

fn saturating_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl BigFloat {
    /// Not-a-number.
    #[must_use]
    pub fn nan(prec: u32) -> Self {
        Self(Float::with_val(clamp_precision(prec), Special::Nan))
    }

    /// Signed infinity.
    #[must_use]
    pub fn infinity(negative: bool, prec: u32) -> Self {
        let special = if negative {
            Special::NegInfinity
        } else {
            Special::Infinity
        };
        Self(Float::with_val(clamp_precision(prec), special))
    }

    /// Signed zero.
    #[must_use]
    pub fn zero(negative: bool, prec: u32) -> Self {
        let special = if negative {
            Special::NegZero
        } else {
            Special::Zero
        };
        Self(Float::with_val(clamp_precision(prec), special))
    }

    /// Largest finite magnitude of `prec` bits below `2^emax`.
    pub(crate) fn max_finite(negative: bool, prec: u32, emax: i64) -> Self {
        let mut value = Float::with_val(prec, 1);
        value.next_down();
        value <<= saturating_i32(emax);
        let value = Self(value);
        if negative {
            -value
        } else {
            value
        }
    }

    /// Smallest magnitude `2^(emin - 1)`.
    pub(crate) fn min_positive(negative: bool, prec: u32, emin: i64) -> Self {
        let mut value = Float::with_val(prec, if negative { -1 } else { 1 });
        value <<= saturating_i32(emin - 1);
        Self(value)
    }

    /// Exact conversion from an `f64`; the result has 53 bits of precision.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self(Float::with_val(F64_PRECISION, value))
    }

    /// `±significand * 2^exp2`, rounded to `prec` bits.
    #[must_use]
    pub fn from_scaled(
        negative: bool,
        significand: &BigUint,
        exp2: i64,
        prec: u32,
        round: Round,
    ) -> (Self, Ordering) {
        if significand.is_zero() {
            return (Self::zero(negative, prec), Ordering::Equal);
        }
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        let integer = integer_to_rug(&BigInt::from_biguint(sign, significand.clone()));
        let (mut value, dir) =
            Float::with_val_round(clamp_precision(prec), &integer, round.into());
        // Scaling by a power of two is exact inside the exponent range.
        value <<= saturating_i32(exp2);
        (Self(value), dir)
    }

    /// An integer rounded to `prec` bits.
    #[must_use]
    pub fn with_integer(value: &BigInt, prec: u32, round: Round) -> (Self, Ordering) {
        let integer = integer_to_rug(value);
        let (value, dir) = Float::with_val_round(clamp_precision(prec), &integer, round.into());
        (Self(value), dir)
    }

    /// A rational rounded to `prec` bits.
    #[must_use]
    pub fn with_ratio(value: &BigRational, prec: u32, round: Round) -> (Self, Ordering) {
        let ratio = rational_to_rug(value);
        let (value, dir) = Float::with_val_round(clamp_precision(prec), &ratio, round.into());
        (Self(value), dir)
    }

    /// This value rounded to a new precision.
    #[must_use]
    pub fn with_prec(&self, prec: u32, round: Round) -> (Self, Ordering) {
        let mut value = self.0.clone();
        let dir = value.set_prec_round(clamp_precision(prec), round.into());
        (Self(value), dir)
    }

    /// Set to `+0`, keeping the precision and the MPFR limbs.
    pub(crate) fn clear(&mut self) {
        self.0.assign(Special::Zero);
    }

    /// The underlying MPFR value.
    #[must_use]
    pub fn as_float(&self) -> &Float {
        &self.0
    }

    #[must_use]
    pub fn into_float(self) -> Float {
        self.0
    }

    /// Precision in bits.
    #[must_use]
    pub fn prec(&self) -> u32 {
        self.0.prec()
    }

    /// Whether this is NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    /// Whether this is an infinity.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.0.is_infinite()
    }

    /// Whether this is a zero of either sign.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Whether this is neither NaN nor an infinity.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Whether this is finite and non-zero.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.0.is_normal()
    }

    /// Whether the sign bit is set. NaN reports `false`.
    #[must_use]
    pub fn is_sign_negative(&self) -> bool {
        !self.0.is_nan() && self.0.is_sign_negative()
    }

    /// Exponent `e` with the value in `[2^(e-1), 2^e)`, for finite non-zero values.
    #[must_use]
    pub fn exponent(&self) -> Option<i64> {
        self.0.get_exp().map(i64::from)
    }

    /// The `prec`-bit significand as an integer, for finite non-zero values.
    #[must_use]
    pub fn significand(&self) -> Option<BigUint> {
        if !self.0.is_normal() {
            return None;
        }
        let (mant, _) = self.0.to_integer_exp()?;
        let mant = integer_from_rug(&mant).magnitude().clone();
        let bits = mant.bits();
        let prec = u64::from(self.prec());
        Some(if bits < prec { mant << (prec - bits) } else { mant })
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        if self.is_sign_negative() {
            -self.clone()
        } else {
            self.clone()
        }
    }

    /// Exact rational value, for finite values.
    #[must_use]
    pub fn to_rational(&self) -> Option<BigRational> {
        self.0.to_rational().map(|r| rational_from_rug(&r))
    }

    /// Nearest `f64`, rounded once even in the subnormal range.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }
}

impl From<Float> for BigFloat {
    fn from(value: Float) -> Self {
        Self(value)
    }
}

impl Neg for BigFloat {
    type Output = BigFloat;

    fn neg(self) -> BigFloat {
        Self(-self.0)
    }
}

impl PartialEq for BigFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for BigFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Hash for BigFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            0u8.hash(state);
        } else if self.0.is_zero() {
            1u8.hash(state);
        } else if self.0.is_infinite() {
            2u8.hash(state);
            self.0.is_sign_negative().hash(state);
        } else if let Some((mant, exp)) = self.0.to_integer_exp() {
            3u8.hash(state);
            // Trailing zeros depend on precision, not on value.
            let tz = mant.find_one(0).unwrap_or(0);
            (mant >> tz).hash(state);
            (i64::from(exp) + i64::from(tz)).hash(state);
        }
    }
}

impl fmt::Display for BigFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
