//! Golden file integration tests.
//!
//! Reads tests/testdata/codec_golden.json and checks that every vector
//! encodes to the recorded bytes and decodes back to its value.

use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::Deserialize;

use mpnum_codec::{
    decode_float, encode_float, encode_integer, encode_rational, value_from_binary, Kind, Value,
};
use mpnum_core::{BigFloat, Context};

// ---------------------------------------------------------------------------
// Golden data structures
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GoldenData {
    #[allow(dead_code)]
    description: String,
    vectors: Vec<GoldenVector>,
}

#[derive(Deserialize)]
struct GoldenVector {
    kind: String,
    value: String,
    hex: String,
    #[serde(default)]
    precision: Option<i64>,
    #[serde(default)]
    include_precision: bool,
}

fn load_golden_data() -> GoldenData {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/testdata/codec_golden.json");
    let data = std::fs::read_to_string(path).expect("failed to read golden file");
    serde_json::from_str(&data).expect("failed to parse golden JSON")
}

fn vectors_of(kind: Kind) -> Vec<GoldenVector> {
    load_golden_data()
        .vectors
        .into_iter()
        .filter(|v| v.kind.parse::<Kind>().unwrap() == kind)
        .collect()
}

fn float_value(vector: &GoldenVector) -> BigFloat {
    let mut ctx = Context::default();
    ctx.set_precision(vector.precision.expect("float vectors carry a precision"))
        .unwrap();
    ctx.parse(&vector.value).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn golden_file_covers_every_kind() {
    let data = load_golden_data();
    for kind in Kind::ALL {
        assert!(
            data.vectors.iter().any(|v| v.kind == kind.name()),
            "no vectors for {kind}"
        );
    }
}

#[test]
fn golden_negative_three_hundred() {
    let bytes = encode_integer(&BigInt::from(-300));
    assert_eq!(bytes, [0x2C, 0x01, 0xFF]);
    let vector = vectors_of(Kind::Integer)
        .into_iter()
        .find(|v| v.value == "-300")
        .expect("-300 is in the golden file");
    assert_eq!(vector.hex, "2c01ff");
}

#[test]
fn golden_integers() {
    for vector in vectors_of(Kind::Integer) {
        let value = BigInt::from_str(&vector.value).unwrap();
        assert_eq!(hex::encode(encode_integer(&value)), vector.hex, "encode {}", vector.value);
        let decoded = value_from_binary(&hex::decode(&vector.hex).unwrap(), Kind::Integer).unwrap();
        assert_eq!(decoded, Value::Integer(value));
        assert_eq!(decoded.to_string(), vector.value);
    }
}

#[test]
fn golden_rationals() {
    for vector in vectors_of(Kind::Rational) {
        let value = BigRational::from_str(&vector.value).unwrap();
        assert_eq!(
            hex::encode(encode_rational(&value).unwrap()),
            vector.hex,
            "encode {}",
            vector.value
        );
        let decoded =
            value_from_binary(&hex::decode(&vector.hex).unwrap(), Kind::Rational).unwrap();
        assert_eq!(decoded.to_string(), vector.value);
    }
}

#[test]
fn golden_floats() {
    for vector in vectors_of(Kind::Float) {
        let value = float_value(&vector);
        let bytes = encode_float(&value, vector.include_precision).unwrap();
        assert_eq!(hex::encode(&bytes), vector.hex, "encode {}", vector.value);

        let decoded = decode_float(&bytes).unwrap();
        assert_eq!(decoded, value, "decode {}", vector.value);
        if vector.include_precision && !value.is_zero() {
            assert_eq!(i64::from(decoded.prec()), vector.precision.unwrap());
        }
    }
}
