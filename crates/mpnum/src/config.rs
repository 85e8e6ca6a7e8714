//! Application configuration from CLI flags and environment.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use mpnum_codec::Kind;
use mpnum_core::Round;

use crate::version;

/// Encode, decode and approximate multi-precision values.
#[derive(Parser, Debug)]
#[command(name = "mpnum", version, long_version = version::LONG_VERSION, about)]
pub struct AppConfig {
    /// Context precision in bits.
    #[arg(short, long, global = true)]
    pub precision: Option<i64>,

    /// Rounding mode: nearest, zero, up, down or away_zero.
    #[arg(short, long, global = true)]
    pub round: Option<Round>,

    /// JSON settings file for the context and the value cache.
    #[arg(long, global = true, env = "MPNUM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Encode a value and print the bytes as hex.
    Encode {
        /// Kind of value: integer, rational or float.
        #[arg(short, long)]
        kind: Kind,

        /// Decimal value, such as `-300`, `22/7` or `1.5e-3`.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Leave the precision out of a float encoding.
        #[arg(long)]
        no_precision: bool,
    },

    /// Decode hex bytes and print the value.
    Decode {
        /// Kind of value: integer, rational or float.
        #[arg(short, long)]
        kind: Kind,

        /// Hex-encoded bytes.
        hex: String,
    },

    /// Print the fraction of least denominator within an error bound.
    Approx {
        /// Decimal value to approximate.
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Relative error bound: 0 for the value's precision, a negative
        /// `e` for `2^e`, or a positive bound.
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        max_error: f64,

        /// Print a whole result as an integer.
        #[arg(long)]
        integer: bool,
    },

    /// Generate shell completion.
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
