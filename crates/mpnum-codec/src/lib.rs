//! # mpnum-codec
//!
//! Portable binary envelopes for integers, rationals and floats.
//!
//! The three kinds use separate layouts and the caller says which one a byte
//! string holds. Integers and rationals round-trip exactly. Floats round-trip
//! exactly when their precision is written, and otherwise decode at 8 bits
//! per significand byte.
//!
//! ```
//! use mpnum_codec::{decode_integer, encode_integer};
//! use num_bigint::BigInt;
//!
//! let bytes = encode_integer(&BigInt::from(-300));
//! assert_eq!(bytes, [0x2C, 0x01, 0xFF]);
//! assert_eq!(decode_integer(&bytes).unwrap(), BigInt::from(-300));
//! ```

pub mod error;
pub mod float;
pub mod integer;
pub mod rational;
pub mod value;

pub use error::CodecError;
pub use float::{decode_float, encode_float, FloatCode};
pub use integer::{decode_integer, encode_integer};
pub use rational::{decode_rational, encode_rational};
pub use value::{to_binary, value_from_binary, Kind, ParseKindError, Value};
