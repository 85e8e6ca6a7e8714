//! Numeric context: precision, rounding, exponent bounds, sticky flags and traps.
//!
//! Every float-producing operation on a [`Context`] lets MPFR round the
//! exact result once at the context precision, then checks the MPFR ternary
//! value and exponent against the context bounds, ORs the conditions raised
//! into the sticky flags, and checks the enabled traps in priority order. A fired trap returns its typed error and the
//! rounded result is discarded; the flags stay set either way.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rug::ops::AssignRound;
use rug::Float;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EMAX, DEFAULT_EMIN, DEFAULT_PRECISION, EMAX_MAX, EMIN_MIN, PREC_MAX, PREC_MIN,
};
use crate::float::{self, BigFloat};
use crate::round::Round;

/// An exceptional condition an operation may raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The result is NaN, or the operation has no meaningful result.
    Invalid,
    /// A finite non-zero value was divided by zero.
    DivByZero,
    /// The rounded result exceeds the exponent range.
    Overflow,
    /// The result is tiny and was flushed or lost bits as a subnormal.
    Underflow,
    /// The rounded result differs from the exact result.
    Inexact,
    /// A comparison or conversion met a value outside its domain.
    Erange,
}

impl Condition {
    /// Order in which traps are checked.
    pub const TRAP_PRIORITY: [Condition; 6] = [
        Condition::Invalid,
        Condition::DivByZero,
        Condition::Overflow,
        Condition::Underflow,
        Condition::Inexact,
        Condition::Erange,
    ];

    /// The error a trap on this condition returns.
    #[must_use]
    pub fn error(self) -> ContextError {
        match self {
            Condition::Invalid => ContextError::InvalidOperation,
            Condition::DivByZero => ContextError::DivisionByZero,
            Condition::Overflow => ContextError::Overflow,
            Condition::Underflow => ContextError::Underflow,
            Condition::Inexact => ContextError::Inexact,
            Condition::Erange => ContextError::RangeError,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Invalid => "invalid",
            Condition::DivByZero => "divzero",
            Condition::Overflow => "overflow",
            Condition::Underflow => "underflow",
            Condition::Inexact => "inexact",
            Condition::Erange => "erange",
        };
        f.write_str(name)
    }
}

/// One boolean per [`Condition`]; used for both sticky flags and trap enables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditions {
    pub underflow: bool,
    pub overflow: bool,
    pub inexact: bool,
    pub invalid: bool,
    pub erange: bool,
    pub divzero: bool,
}

impl Conditions {
    /// Nothing set.
    pub const NONE: Conditions = Conditions {
        underflow: false,
        overflow: false,
        inexact: false,
        invalid: false,
        erange: false,
        divzero: false,
    };

    /// Everything set.
    pub const ALL: Conditions = Conditions {
        underflow: true,
        overflow: true,
        inexact: true,
        invalid: true,
        erange: true,
        divzero: true,
    };

    fn slot(&mut self, condition: Condition) -> &mut bool {
        match condition {
            Condition::Invalid => &mut self.invalid,
            Condition::DivByZero => &mut self.divzero,
            Condition::Overflow => &mut self.overflow,
            Condition::Underflow => &mut self.underflow,
            Condition::Inexact => &mut self.inexact,
            Condition::Erange => &mut self.erange,
        }
    }

    #[must_use]
    pub fn get(&self, condition: Condition) -> bool {
        match condition {
            Condition::Invalid => self.invalid,
            Condition::DivByZero => self.divzero,
            Condition::Overflow => self.overflow,
            Condition::Underflow => self.underflow,
            Condition::Inexact => self.inexact,
            Condition::Erange => self.erange,
        }
    }

    pub fn set(&mut self, condition: Condition, on: bool) {
        *self.slot(condition) = on;
    }

    pub fn raise(&mut self, condition: Condition) {
        self.set(condition, true);
    }

    /// OR `other` into `self`.
    pub fn merge(&mut self, other: Conditions) {
        for condition in Condition::TRAP_PRIORITY {
            if other.get(condition) {
                self.raise(condition);
            }
        }
    }

    #[must_use]
    pub fn any(&self) -> bool {
        *self != Conditions::NONE
    }

    /// Highest-priority condition set in both `self` and `traps`.
    #[must_use]
    pub fn first_trapped(&self, traps: &Conditions) -> Option<Condition> {
        Condition::TRAP_PRIORITY
            .into_iter()
            .find(|&c| self.get(c) && traps.get(c))
    }

    /// Conditions that are set, in trap priority order.
    pub fn iter(&self) -> impl Iterator<Item = Condition> + '_ {
        Condition::TRAP_PRIORITY.into_iter().filter(|&c| self.get(c))
    }
}

/// Errors raised by context configuration and by trapped conditions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("precision must be between 1 and 2147483391 bits, got {0}")]
    PrecisionRange(i64),

    #[error("{name} out of range: {value}")]
    ExponentRange { name: &'static str, value: i64 },

    #[error("unsupported IEEE interchange width: {0} bits")]
    UnsupportedIeeeWidth(u32),

    #[error("division by zero")]
    DivisionByZero,

    #[error("inexact result")]
    Inexact,

    #[error("invalid operation")]
    InvalidOperation,

    #[error("overflow")]
    Overflow,

    #[error("underflow")]
    Underflow,

    #[error("range error")]
    RangeError,

    #[error("invalid float literal: {0:?}")]
    Parse(String),
}

impl ContextError {
    /// Whether this error comes from a fired trap rather than bad settings.
    #[must_use]
    pub fn is_trap(&self) -> bool {
        matches!(
            self,
            ContextError::DivisionByZero
                | ContextError::Inexact
                | ContextError::InvalidOperation
                | ContextError::Overflow
                | ContextError::Underflow
                | ContextError::RangeError
        )
    }
}

fn check_precision(prec: i64) -> Result<u32, ContextError> {
    u32::try_from(prec)
        .ok()
        .filter(|p| (PREC_MIN..=PREC_MAX).contains(p))
        .ok_or(ContextError::PrecisionRange(prec))
}

fn check_emin(emin: i64) -> Result<i64, ContextError> {
    if (EMIN_MIN..=0).contains(&emin) {
        Ok(emin)
    } else {
        Err(ContextError::ExponentRange {
            name: "emin",
            value: emin,
        })
    }
}

fn check_emax(emax: i64) -> Result<i64, ContextError> {
    if (1..=EMAX_MAX).contains(&emax) {
        Ok(emax)
    } else {
        Err(ContextError::ExponentRange {
            name: "emax",
            value: emax,
        })
    }
}

/// Settings that govern every float-producing operation, plus sticky flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    prec: u32,
    round: Round,
    emin: i64,
    emax: i64,
    subnormalize: bool,
    flags: Conditions,
    traps: Conditions,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            prec: DEFAULT_PRECISION,
            round: Round::Nearest,
            emin: DEFAULT_EMIN,
            emax: DEFAULT_EMAX,
            subnormalize: false,
            flags: Conditions::NONE,
            traps: Conditions::NONE,
        }
    }
}

/// Partial settings applied on top of a context.
///
/// Every field is validated before any is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOverrides {
    pub precision: Option<i64>,
    pub round: Option<Round>,
    pub emin: Option<i64>,
    pub emax: Option<i64>,
    pub subnormalize: Option<bool>,
    pub traps: Option<Conditions>,
}

impl ContextOverrides {
    /// A copy of `base` with these overrides applied.
    pub fn apply_to(&self, base: &Context) -> Result<Context, ContextError> {
        let mut ctx = base.clone();
        if let Some(prec) = self.precision {
            ctx.prec = check_precision(prec)?;
        }
        if let Some(emin) = self.emin {
            ctx.emin = check_emin(emin)?;
        }
        if let Some(emax) = self.emax {
            ctx.emax = check_emax(emax)?;
        }
        if let Some(round) = self.round {
            ctx.round = round;
        }
        if let Some(subnormalize) = self.subnormalize {
            ctx.subnormalize = subnormalize;
        }
        if let Some(traps) = self.traps {
            ctx.traps = traps;
        }
        Ok(ctx)
    }
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context of an IEEE 754 binary interchange format.
    ///
    /// Accepts 16, 32, 64, 128, and multiples of 32 above 128 whose
    /// exponent range fits.
    pub fn ieee(bits: u32) -> Result<Self, ContextError> {
        let prec = match bits {
            16 => 11,
            32 => 24,
            64 => 53,
            128 => 113,
            b if b > 128 && b % 32 == 0 => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let width_bits = (4.0 * f64::from(b).log2()).round() as u32;
                b + 13 - width_bits
            }
            _ => return Err(ContextError::UnsupportedIeeeWidth(bits)),
        };
        let exp_bits = bits - prec;
        if exp_bits > 30 {
            return Err(ContextError::UnsupportedIeeeWidth(bits));
        }
        let emax = 1i64 << (exp_bits - 1);
        let emin = 4 - emax - i64::from(prec);
        Ok(Self {
            prec,
            emin: check_emin(emin)?,
            emax: check_emax(emax)?,
            subnormalize: true,
            ..Self::default()
        })
    }

    /// Precision in bits.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.prec
    }

    #[must_use]
    pub fn round(&self) -> Round {
        self.round
    }

    #[must_use]
    pub fn emin(&self) -> i64 {
        self.emin
    }

    #[must_use]
    pub fn emax(&self) -> i64 {
        self.emax
    }

    #[must_use]
    pub fn subnormalize(&self) -> bool {
        self.subnormalize
    }

    /// Sticky flags raised since they were last cleared.
    #[must_use]
    pub fn flags(&self) -> Conditions {
        self.flags
    }

    /// Enabled traps.
    #[must_use]
    pub fn traps(&self) -> Conditions {
        self.traps
    }

    /// Set the precision. Out-of-range values leave the context unchanged.
    pub fn set_precision(&mut self, prec: i64) -> Result<(), ContextError> {
        self.prec = check_precision(prec)?;
        Ok(())
    }

    pub fn set_round(&mut self, round: Round) {
        self.round = round;
    }

    pub fn set_emin(&mut self, emin: i64) -> Result<(), ContextError> {
        self.emin = check_emin(emin)?;
        Ok(())
    }

    pub fn set_emax(&mut self, emax: i64) -> Result<(), ContextError> {
        self.emax = check_emax(emax)?;
        Ok(())
    }

    pub fn set_subnormalize(&mut self, on: bool) {
        self.subnormalize = on;
    }

    pub fn set_traps(&mut self, traps: Conditions) {
        self.traps = traps;
    }

    pub fn set_trap(&mut self, condition: Condition, on: bool) {
        self.traps.set(condition, on);
    }

    /// Reset the sticky flags; traps and settings are untouched.
    pub fn clear_flags(&mut self) {
        self.flags = Conditions::NONE;
    }

    /// Record `raised` and fire the highest-priority enabled trap.
    fn settle<T>(&mut self, value: T, raised: Conditions) -> Result<T, ContextError> {
        self.flags.merge(raised);
        if let Some(condition) = raised.first_trapped(&self.traps) {
            tracing::debug!(%condition, "trap fired");
            return Err(condition.error());
        }
        Ok(value)
    }

    /// Bring an MPFR result and its ternary value into this context's
    /// exponent range, recording what the rounding raised.
    fn fit(&self, value: Float, dir: Ordering, raised: &mut Conditions) -> BigFloat {
        if value.is_nan() {
            raised.raise(Condition::Invalid);
            return BigFloat::nan(self.prec);
        }
        let negative = value.is_sign_negative();
        let Some(exp) = value.get_exp().map(i64::from) else {
            return match dir {
                Ordering::Equal => BigFloat::from(value),
                // MPFR left its own exponent range.
                _ if value.is_infinite() => self.overflowed(negative, raised),
                _ => self.underflowed(negative, false, raised),
            };
        };
        if exp > self.emax {
            return self.overflowed(negative, raised);
        }
        if exp < self.emin {
            // Only a value in (2^(emin-2), 2^(emin-1)) reaches the smallest
            // magnitude under round-to-nearest; the midpoint goes to zero.
            let magnitude = Round::signed_direction(negative, dir);
            let above_half = exp == self.emin - 1
                && !(is_power_of_two(&value) && magnitude != Ordering::Less);
            return self.underflowed(negative, above_half, raised);
        }

        let mut value = value;
        let mut dir = dir;
        if self.subnormalize {
            let normal = self.emin + i64::from(self.prec) - 1;
            if let Ok(normal_exp_min) = i32::try_from(normal) {
                dir = value.subnormalize_round(normal_exp_min, dir, self.round.into());
                if exp < normal && dir != Ordering::Equal {
                    raised.raise(Condition::Underflow);
                }
            }
        }
        if dir != Ordering::Equal {
            raised.raise(Condition::Inexact);
        }
        BigFloat::from(value)
    }

    fn overflowed(&self, negative: bool, raised: &mut Conditions) -> BigFloat {
        raised.raise(Condition::Overflow);
        raised.raise(Condition::Inexact);
        if self.round.rounds_outward(negative) {
            BigFloat::infinity(negative, self.prec)
        } else {
            BigFloat::max_finite(negative, self.prec, self.emax)
        }
    }

    /// Result of a non-zero value that rounded below `2^(emin - 1)`: zero or
    /// the smallest magnitude.
    fn underflowed(&self, negative: bool, above_half: bool, raised: &mut Conditions) -> BigFloat {
        raised.raise(Condition::Underflow);
        raised.raise(Condition::Inexact);
        let outward = if self.round == Round::Nearest {
            above_half
        } else {
            self.round.rounds_outward(negative)
        };
        if outward {
            BigFloat::min_positive(negative, self.prec, self.emin)
        } else {
            BigFloat::zero(negative, self.prec)
        }
    }

    /// Round `source` at the context precision and settle the result.
    fn assign<T>(&mut self, source: T) -> Result<BigFloat, ContextError>
    where
        Float: AssignRound<T, Round = rug::float::Round, Ordering = Ordering>,
    {
        let (value, dir) = Float::with_val_round(self.prec, source, self.round.into());
        let mut raised = Conditions::NONE;
        let value = self.fit(value, dir, &mut raised);
        self.settle(value, raised)
    }

    /// `a + b`.
    pub fn add(&mut self, a: &BigFloat, b: &BigFloat) -> Result<BigFloat, ContextError> {
        self.assign(a.as_float() + b.as_float())
    }

    /// `a - b`.
    pub fn sub(&mut self, a: &BigFloat, b: &BigFloat) -> Result<BigFloat, ContextError> {
        self.assign(a.as_float() - b.as_float())
    }

    /// `a * b`.
    pub fn mul(&mut self, a: &BigFloat, b: &BigFloat) -> Result<BigFloat, ContextError> {
        self.assign(a.as_float() * b.as_float())
    }

    /// `a / b`. A finite non-zero `a` over zero raises divzero.
    pub fn div(&mut self, a: &BigFloat, b: &BigFloat) -> Result<BigFloat, ContextError> {
        if a.is_normal() && b.is_zero() {
            let negative = a.is_sign_negative() != b.as_float().is_sign_negative();
            let mut raised = Conditions::NONE;
            raised.raise(Condition::DivByZero);
            return self.settle(BigFloat::infinity(negative, self.prec), raised);
        }
        self.assign(a.as_float() / b.as_float())
    }

    /// Square root of `a`.
    pub fn sqrt(&mut self, a: &BigFloat) -> Result<BigFloat, ContextError> {
        self.assign(a.as_float().sqrt_ref())
    }

    /// `-a`, rounded to context precision.
    pub fn neg(&mut self, a: &BigFloat) -> Result<BigFloat, ContextError> {
        self.assign(-a.as_float())
    }

    /// `|a|`, rounded to context precision.
    pub fn abs(&mut self, a: &BigFloat) -> Result<BigFloat, ContextError> {
        self.assign(a.abs().as_float())
    }

    /// Re-round `a` into this context.
    pub fn round_value(&mut self, a: &BigFloat) -> Result<BigFloat, ContextError> {
        self.assign(a.as_float())
    }

    pub fn from_f64(&mut self, value: f64) -> Result<BigFloat, ContextError> {
        self.assign(value)
    }

    pub fn from_integer(&mut self, value: &BigInt) -> Result<BigFloat, ContextError> {
        self.assign(&float::integer_to_rug(value))
    }

    pub fn from_rational(&mut self, value: &BigRational) -> Result<BigFloat, ContextError> {
        self.assign(&float::rational_to_rug(value))
    }

    /// Parse a decimal literal, rounding it once into this context.
    ///
    /// Accepts `[+-]digits[.digits][e[+-]digits]`, `inf`, `infinity` and
    /// `nan` in any case.
    pub fn parse(&mut self, text: &str) -> Result<BigFloat, ContextError> {
        let literal =
            Float::parse(text.trim()).map_err(|_| ContextError::Parse(text.to_string()))?;
        self.assign(literal)
    }

    /// Compare two values. NaN operands raise erange and compare unordered.
    pub fn cmp(&mut self, a: &BigFloat, b: &BigFloat) -> Result<Option<Ordering>, ContextError> {
        let mut raised = Conditions::NONE;
        let ordering = a.partial_cmp(b);
        if ordering.is_none() {
            raised.raise(Condition::Erange);
        }
        self.settle(ordering, raised)
    }

    /// Round `a` to an integer under the context rounding mode.
    ///
    /// NaN and infinities raise erange and yield zero; a non-integral value
    /// raises inexact.
    pub fn to_integer(&mut self, a: &BigFloat) -> Result<BigInt, ContextError> {
        let mut raised = Conditions::NONE;
        let Some(exact) = a.to_rational() else {
            raised.raise(Condition::Erange);
            return self.settle(BigInt::zero(), raised);
        };
        if !exact.is_integer() {
            raised.raise(Condition::Inexact);
        }
        let value = round_rational(&exact, self.round);
        self.settle(value, raised)
    }
}

fn is_power_of_two(value: &Float) -> bool {
    value
        .to_integer_exp()
        .is_some_and(|(mant, _)| mant.abs().is_power_of_two())
}

fn round_rational(value: &BigRational, round: Round) -> BigInt {
    let rounded = match round {
        Round::Zero => value.trunc(),
        Round::Up => value.ceil(),
        Round::Down => value.floor(),
        Round::AwayZero => {
            if value.is_negative() {
                value.floor()
            } else {
                value.ceil()
            }
        }
        Round::Nearest => {
            let floor = value.floor();
            let half = BigRational::new(BigInt::one(), BigInt::from(2));
            match (value - &floor).cmp(&half) {
                Ordering::Less => floor,
                Ordering::Greater => floor + BigInt::one(),
                Ordering::Equal => {
                    if floor.to_integer().is_even() {
                        floor
                    } else {
                        floor + BigInt::one()
                    }
                }
            }
        }
    };
    rounded.to_integer()
}
