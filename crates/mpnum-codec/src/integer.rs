//! Integer envelope.
//!
//! Little-endian base-256 magnitude. A negative value carries one trailing
//! `0xFF`. A non-negative value whose last magnitude byte has its top bit set
//! carries one trailing `0x00`, so it can never end in `0xFF`. Zero is the
//! single byte `0x00`.

use num_bigint::{BigInt, BigUint, Sign};

use crate::error::CodecError;
use crate::value::Kind;

const NEGATIVE_MARK: u8 = 0xFF;
const PAD: u8 = 0x00;

/// Encode an integer.
#[must_use]
pub fn encode_integer(value: &BigInt) -> Vec<u8> {
    let (sign, magnitude) = value.to_bytes_le();
    if sign == Sign::NoSign {
        return vec![PAD];
    }
    let mut bytes = magnitude;
    if sign == Sign::Minus {
        bytes.push(NEGATIVE_MARK);
    } else if bytes.last().is_some_and(|b| b & 0x80 != 0) {
        bytes.push(PAD);
    }
    bytes
}

/// Decode an integer produced by [`encode_integer`].
pub fn decode_integer(bytes: &[u8]) -> Result<BigInt, CodecError> {
    let Some((&last, rest)) = bytes.split_last() else {
        return Err(CodecError::truncated(Kind::Integer, 1, 0));
    };
    let value = match last {
        NEGATIVE_MARK => BigInt::from_biguint(Sign::Minus, BigUint::from_bytes_le(rest)),
        _ => BigInt::from(BigUint::from_bytes_le(bytes)),
    };
    Ok(value)
}
