//! Float envelope.
//!
//! ```text
//! code (1) | precision u32 LE (4, optional) | |L| u32 LE (4) | significand (n)
//! ```
//!
//! The significand is the hex expansion `0.d1 d2 ... dk` with its base-16
//! exponent `E16`, so that `x = 0.d1d2... * 16^E16`. Two nibbles go in each
//! byte, which makes the byte exponent `L = ceil(E16 / 2)`. An odd `E16` gets
//! one leading zero nibble and an odd nibble count gets one trailing zero
//! nibble. Decoding reads `S` as a big-endian integer over `n` bytes and
//! yields `±S * 256^(L - n)`.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use mpnum_core::{BigFloat, Round, DEFAULT_PRECISION, EMAX_MAX, EMIN_MIN, PREC_MAX, PREC_MIN};

use crate::error::CodecError;
use crate::value::Kind;

const SIGN: u8 = 0x01;
const EXPONENT_SIGN: u8 = 0x02;
const ZERO: u8 = 0x04;
const PRECISION_INCLUDED: u8 = 0x08;
const INFINITE: u8 = 0x10;
const NAN: u8 = 0x20;
const RESERVED: u8 = 0xC0;

/// Smallest encoding of a non-zero finite float without precision.
const MIN_FINITE_LEN: usize = 6;
const FIELD_LEN: usize = 4;

/// The leading code byte of an encoded float, as a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatCode {
    pub negative: bool,
    pub exponent_negative: bool,
    pub zero: bool,
    pub precision_included: bool,
    pub infinite: bool,
    pub nan: bool,
}

impl FloatCode {
    #[must_use]
    pub fn to_byte(self) -> u8 {
        [
            (self.negative, SIGN),
            (self.exponent_negative, EXPONENT_SIGN),
            (self.zero, ZERO),
            (self.precision_included, PRECISION_INCLUDED),
            (self.infinite, INFINITE),
            (self.nan, NAN),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(0, |byte, (_, bit)| byte | bit)
    }

    /// Parse a code byte, rejecting reserved bits and mixed special kinds.
    pub fn from_byte(byte: u8) -> Result<Self, CodecError> {
        if byte & RESERVED != 0 {
            return Err(CodecError::ReservedBits(byte));
        }
        let code = Self {
            negative: byte & SIGN != 0,
            exponent_negative: byte & EXPONENT_SIGN != 0,
            zero: byte & ZERO != 0,
            precision_included: byte & PRECISION_INCLUDED != 0,
            infinite: byte & INFINITE != 0,
            nan: byte & NAN != 0,
        };
        let specials = [code.zero, code.infinite, code.nan]
            .into_iter()
            .filter(|&set| set)
            .count();
        if specials > 1 {
            return Err(CodecError::ConflictingCode(byte));
        }
        Ok(code)
    }

    fn is_special(self) -> bool {
        self.zero || self.infinite || self.nan
    }
}

/// Encode a float. Zero, infinities and NaN take a single byte.
pub fn encode_float(value: &BigFloat, include_precision: bool) -> Result<Vec<u8>, CodecError> {
    let negative = value.is_sign_negative();
    let (Some(mant), Some(exp)) = (value.significand(), value.exponent()) else {
        let code = FloatCode {
            negative: negative && !value.is_nan(),
            zero: value.is_zero(),
            infinite: value.is_infinite(),
            nan: value.is_nan(),
            ..FloatCode::default()
        };
        return Ok(vec![code.to_byte()]);
    };

    let prec = value.prec();
    let e16 = Integer::div_ceil(&exp, &4);
    let shift = u64::try_from(4 * e16 - exp).map_err(|_| CodecError::ExponentRange(exp))?;
    let digits = (u64::from(prec) + shift).div_ceil(4);
    let odd = e16.is_odd();
    let nibbles = digits + u64::from(odd);
    let len = nibbles.div_ceil(2);
    // Value digits, then the padding nibble if the count is odd.
    let significand: BigUint =
        (mant << (4 * digits - u64::from(prec) - shift)) << (4 * (2 * len - nibbles));

    let byte_exponent = Integer::div_ceil(&e16, &2);
    let magnitude =
        u32::try_from(byte_exponent.unsigned_abs()).map_err(|_| CodecError::ExponentRange(exp))?;

    let code = FloatCode {
        negative,
        exponent_negative: byte_exponent < 0,
        precision_included: include_precision,
        ..FloatCode::default()
    };
    let digits_be = significand.to_bytes_be();
    let len = usize::try_from(len).map_err(|_| CodecError::ExponentRange(exp))?;

    let mut out = Vec::with_capacity(1 + 2 * FIELD_LEN + len);
    out.push(code.to_byte());
    if include_precision {
        out.extend_from_slice(&prec.to_le_bytes());
    }
    out.extend_from_slice(&magnitude.to_le_bytes());
    out.resize(out.len() + len - digits_be.len(), 0);
    out.extend_from_slice(&digits_be);
    Ok(out)
}

/// Decode a float produced by [`encode_float`].
///
/// Special values decode at the default precision. Without an included
/// precision, a finite value gets 8 bits per significand byte. A byte
/// exponent whose bit exponent `8 * L` leaves `EMIN_MIN..=EMAX_MAX` is
/// rejected.
pub fn decode_float(bytes: &[u8]) -> Result<BigFloat, CodecError> {
    let Some(&first) = bytes.first() else {
        return Err(CodecError::truncated(Kind::Float, 1, 0));
    };
    let code = FloatCode::from_byte(first)?;
    if code.is_special() {
        let value = if code.nan {
            BigFloat::nan(DEFAULT_PRECISION)
        } else if code.infinite {
            BigFloat::infinity(code.negative, DEFAULT_PRECISION)
        } else {
            BigFloat::zero(code.negative, DEFAULT_PRECISION)
        };
        return Ok(value);
    }

    let needed = MIN_FINITE_LEN + if code.precision_included { FIELD_LEN } else { 0 };
    if bytes.len() < needed {
        return Err(CodecError::truncated(Kind::Float, needed, bytes.len()));
    }
    let mut rest = &bytes[1..];
    let included = if code.precision_included {
        let (field, tail) = rest.split_at(FIELD_LEN);
        rest = tail;
        Some(read_u32(field))
    } else {
        None
    };
    let (field, digits) = rest.split_at(FIELD_LEN);
    let magnitude = i64::from(read_u32(field));
    let byte_exponent = if code.exponent_negative { -magnitude } else { magnitude };
    let exponent = 8 * byte_exponent;
    if !(EMIN_MIN..=EMAX_MAX).contains(&exponent) {
        return Err(CodecError::ExponentRange(exponent));
    }

    let significand = BigUint::from_bytes_be(digits);
    if significand.is_zero() {
        return Err(CodecError::ZeroSignificand);
    }
    let len = digits.len() as u64;
    let prec = match included {
        Some(prec) => u64::from(prec),
        None => 8 * len,
    };
    let prec = u32::try_from(prec)
        .ok()
        .filter(|p| (PREC_MIN..=PREC_MAX).contains(p))
        .ok_or(CodecError::PrecisionRange(prec))?;

    let len = i64::try_from(len).map_err(|_| CodecError::PrecisionRange(8 * len))?;
    let (value, _) = BigFloat::from_scaled(
        code.negative,
        &significand,
        exponent - 8 * len,
        prec,
        Round::Nearest,
    );
    Ok(value)
}

fn read_u32(field: &[u8]) -> u32 {
    let mut word = [0u8; FIELD_LEN];
    word.copy_from_slice(field);
    u32::from_le_bytes(word)
}
