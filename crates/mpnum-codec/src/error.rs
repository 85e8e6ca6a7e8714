//! Codec error types.

use crate::value::Kind;

/// Failure to encode or decode a value. No partial value is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("truncated {kind} encoding: need at least {needed} bytes, got {got}")]
    Truncated {
        kind: Kind,
        needed: usize,
        got: usize,
    },

    #[error("rational denominator decodes to zero")]
    InvalidDenominator,

    #[error("numerator of {0} bytes exceeds the 31-bit length field")]
    LengthRange(usize),

    #[error("reserved float code bits set in {0:#04x}")]
    ReservedBits(u8),

    #[error("float code {0:#04x} marks more than one special value")]
    ConflictingCode(u8),

    #[error("float precision {0} is out of range")]
    PrecisionRange(u64),

    #[error("zero significand under a non-zero float code")]
    ZeroSignificand,

    #[error("float exponent {0} is outside the supported exponent range")]
    ExponentRange(i64),
}

impl CodecError {
    pub(crate) fn truncated(kind: Kind, needed: usize, got: usize) -> Self {
        CodecError::Truncated { kind, needed, got }
    }
}
