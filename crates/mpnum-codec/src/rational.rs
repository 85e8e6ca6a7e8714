//! Rational envelope.
//!
//! A 4-byte little-endian numerator length whose top bit is the sign, the
//! numerator magnitude (little-endian), then the denominator magnitude
//! filling the rest. Zero has a one-byte numerator.

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::Zero;

use crate::error::CodecError;
use crate::value::Kind;

const SIGN_BIT: u32 = 0x8000_0000;
const HEADER_LEN: usize = 4;
const MIN_LEN: usize = HEADER_LEN + 2;

/// Encode a rational in lowest terms with a positive denominator.
pub fn encode_rational(value: &BigRational) -> Result<Vec<u8>, CodecError> {
    if value.denom().is_zero() {
        return Err(CodecError::InvalidDenominator);
    }
    let canonical = BigRational::new(value.numer().clone(), value.denom().clone());
    let numer = canonical.numer().magnitude().to_bytes_le();
    let denom = canonical.denom().magnitude().to_bytes_le();

    let len = u32::try_from(numer.len())
        .ok()
        .filter(|len| len & SIGN_BIT == 0)
        .ok_or(CodecError::LengthRange(numer.len()))?;
    let header = if canonical.numer().sign() == Sign::Minus {
        len | SIGN_BIT
    } else {
        len
    };

    let mut out = Vec::with_capacity(HEADER_LEN + numer.len() + denom.len());
    out.extend_from_slice(&header.to_le_bytes());
    out.extend_from_slice(&numer);
    out.extend_from_slice(&denom);
    Ok(out)
}

/// Decode a rational produced by [`encode_rational`], canonicalizing it.
pub fn decode_rational(bytes: &[u8]) -> Result<BigRational, CodecError> {
    if bytes.len() < MIN_LEN {
        return Err(CodecError::truncated(Kind::Rational, MIN_LEN, bytes.len()));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    let header = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let negative = header & SIGN_BIT != 0;
    let len = (header & !SIGN_BIT) as usize;
    if len >= body.len() {
        return Err(CodecError::truncated(
            Kind::Rational,
            HEADER_LEN + len + 1,
            bytes.len(),
        ));
    }

    let (numer, denom) = body.split_at(len);
    let denom = BigUint::from_bytes_le(denom);
    if denom.is_zero() {
        return Err(CodecError::InvalidDenominator);
    }
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    let numer = BigInt::from_biguint(sign, BigUint::from_bytes_le(numer));
    Ok(BigRational::new(numer, BigInt::from(denom)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn layout() {
        assert_eq!(
            encode_rational(&ratio(-3, 4)).unwrap(),
            vec![0x01, 0x00, 0x00, 0x80, 0x03, 0x04]
        );
        assert_eq!(
            encode_rational(&ratio(300, 7)).unwrap(),
            vec![0x02, 0x00, 0x00, 0x00, 0x2C, 0x01, 0x07]
        );
    }

    #[test]
    fn zero_has_one_byte_numerator() {
        let bytes = encode_rational(&BigRational::zero()).unwrap();
        assert_eq!(bytes, vec![0x01, 0x00, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(decode_rational(&bytes).unwrap(), BigRational::zero());
    }

    #[test]
    fn encoding_is_canonical() {
        let raw = BigRational::new_raw(BigInt::from(6), BigInt::from(-8));
        assert_eq!(
            encode_rational(&raw).unwrap(),
            encode_rational(&ratio(-3, 4)).unwrap()
        );
        let zero_denom = BigRational::new_raw(BigInt::from(1), BigInt::from(0));
        assert_eq!(encode_rational(&zero_denom), Err(CodecError::InvalidDenominator));
    }

    #[test]
    fn decoding_canonicalizes() {
        // 6/8 written by hand.
        let decoded = decode_rational(&[0x01, 0x00, 0x00, 0x00, 0x06, 0x08]).unwrap();
        assert_eq!(decoded, ratio(3, 4));
        assert_eq!(decoded.numer(), &BigInt::from(3));
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(
            decode_rational(&[0x01, 0x00, 0x00, 0x00, 0x01]),
            Err(CodecError::Truncated { needed: 6, got: 5, .. })
        ));
        // Numerator length swallows the denominator.
        assert!(matches!(
            decode_rational(&[0x02, 0x00, 0x00, 0x00, 0x01, 0x02]),
            Err(CodecError::Truncated { needed: 7, got: 6, .. })
        ));
        assert_eq!(
            decode_rational(&[0x01, 0x00, 0x00, 0x00, 0x01, 0x00]),
            Err(CodecError::InvalidDenominator)
        );
    }
}
