//! Tagged values and the kind-dispatching entry points.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;

use mpnum_core::BigFloat;

use crate::error::CodecError;
use crate::float::{decode_float, encode_float};
use crate::integer::{decode_integer, encode_integer};
use crate::rational::{decode_rational, encode_rational};

/// Which envelope a byte string uses. The bytes do not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Rational,
    Float,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Integer, Kind::Rational, Kind::Float];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Rational => "rational",
            Kind::Float => "float",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unknown kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value kind: {0} (expected integer, rational or float)")]
pub struct ParseKindError(pub String);

impl FromStr for Kind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integer" | "int" | "mpz" => Ok(Kind::Integer),
            "rational" | "ratio" | "mpq" => Ok(Kind::Rational),
            "float" | "mpfr" => Ok(Kind::Float),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// A multi-precision value of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(BigInt),
    Rational(BigRational),
    Float(BigFloat),
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Rational(_) => Kind::Rational,
            Value::Float(_) => Kind::Float,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Rational(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::Integer(v)
    }
}

impl From<BigRational> for Value {
    fn from(v: BigRational) -> Self {
        Value::Rational(v)
    }
}

impl From<BigFloat> for Value {
    fn from(v: BigFloat) -> Self {
        Value::Float(v)
    }
}

/// Encode any value. Floats keep their precision.
pub fn to_binary(value: &Value) -> Result<Vec<u8>, CodecError> {
    match value {
        Value::Integer(v) => Ok(encode_integer(v)),
        Value::Rational(v) => encode_rational(v),
        Value::Float(v) => encode_float(v, true),
    }
}

/// Decode `bytes` as a value of the given kind.
pub fn value_from_binary(bytes: &[u8], kind: Kind) -> Result<Value, CodecError> {
    let decoded = match kind {
        Kind::Integer => decode_integer(bytes).map(Value::Integer),
        Kind::Rational => decode_rational(bytes).map(Value::Rational),
        Kind::Float => decode_float(bytes).map(Value::Float),
    };
    if let Err(ref error) = decoded {
        tracing::debug!(%kind, len = bytes.len(), %error, "decode failed");
    }
    decoded
}
