//! Rounding modes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction in which an inexact result is rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    /// Round to nearest, ties to even.
    #[default]
    Nearest,
    /// Round toward zero.
    Zero,
    /// Round toward positive infinity.
    Up,
    /// Round toward negative infinity.
    Down,
    /// Round away from zero.
    AwayZero,
}

impl Round {
    /// All modes, in declaration order.
    pub const ALL: [Round; 5] = [
        Round::Nearest,
        Round::Zero,
        Round::Up,
        Round::Down,
        Round::AwayZero,
    ];

    /// Whether an out-of-range magnitude goes to infinity (or the smallest
    /// value, on underflow) rather than to the largest finite value (or zero).
    #[must_use]
    pub fn rounds_outward(self, negative: bool) -> bool {
        match self {
            Round::Nearest | Round::AwayZero => true,
            Round::Zero => false,
            Round::Up => !negative,
            Round::Down => negative,
        }
    }

    /// Converts between the ordering of a rounded value against the exact
    /// value and the ordering of their magnitudes. The map is its own inverse.
    #[must_use]
    pub fn signed_direction(negative: bool, magnitude: Ordering) -> Ordering {
        if negative {
            magnitude.reverse()
        } else {
            magnitude
        }
    }
}

impl From<Round> for rug::float::Round {
    fn from(round: Round) -> Self {
        match round {
            Round::Nearest => rug::float::Round::Nearest,
            Round::Zero => rug::float::Round::Zero,
            Round::Up => rug::float::Round::Up,
            Round::Down => rug::float::Round::Down,
            Round::AwayZero => rug::float::Round::AwayZero,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Round::Nearest => "nearest",
            Round::Zero => "zero",
            Round::Up => "up",
            Round::Down => "down",
            Round::AwayZero => "away_zero",
        };
        f.write_str(name)
    }
}

/// Error returned when a rounding mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rounding mode: {0}")]
pub struct ParseRoundError(pub String);

impl FromStr for Round {
    type Err = ParseRoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "n" => Ok(Round::Nearest),
            "zero" | "z" => Ok(Round::Zero),
            "up" | "u" | "ceil" => Ok(Round::Up),
            "down" | "d" | "floor" => Ok(Round::Down),
            "away_zero" | "away" | "a" => Ok(Round::AwayZero),
            other => Err(ParseRoundError(other.to_string())),
        }
    }
}
