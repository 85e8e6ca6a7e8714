//! The `Recycle` trait and its implementations for the `num` value types.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::Zero;

/// Kind tag of a pooled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Arbitrary-precision integer.
    Integer,
    /// Canonical fraction of two integers.
    Rational,
    /// Binary floating-point value with explicit precision.
    Float,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Rational => "rational",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

/// A value type that can be parked in a [`ValuePool`](crate::ValuePool).
pub trait Recycle: Sized {
    /// Kind tag of this value type.
    const KIND: ValueKind;

    /// Build a blank on the fresh-allocation path.
    fn fresh() -> Self;

    /// Size of the value in 64-bit words, used against the per-object limit.
    ///
    /// `num-bigint` does not expose the capacity of its digit vectors, so the
    /// integer and rational implementations report the words the current
    /// value needs. A value that shrank after a large computation may hold
    /// more storage than this reports. [`ValuePool::release`](crate::ValuePool::release)
    /// measures before [`recycle`](Recycle::recycle) zeroes the value.
    fn words(&self) -> usize;

    /// Reset value-level state before the value is parked.
    ///
    /// Implementations must keep the digit storage when they can.
    fn recycle(&mut self) {}
}

pub(crate) fn words_for_bits(bits: u64) -> usize {
    usize::try_from(bits.div_ceil(64)).unwrap_or(usize::MAX)
}

impl Recycle for BigUint {
    const KIND: ValueKind = ValueKind::Integer;

    fn fresh() -> Self {
        Self::zero()
    }

    fn words(&self) -> usize {
        words_for_bits(self.bits())
    }

    fn recycle(&mut self) {
        self.set_zero();
    }
}

impl Recycle for BigInt {
    const KIND: ValueKind = ValueKind::Integer;

    fn fresh() -> Self {
        Self::zero()
    }

    fn words(&self) -> usize {
        words_for_bits(self.bits())
    }

    fn recycle(&mut self) {
        self.set_zero();
    }
}

impl Recycle for BigRational {
    const KIND: ValueKind = ValueKind::Rational;

    fn fresh() -> Self {
        Self::zero()
    }

    fn words(&self) -> usize {
        words_for_bits(self.numer().bits()) + words_for_bits(self.denom().bits())
    }
}
