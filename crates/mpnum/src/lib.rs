//! mpnum: multi-precision numeric contexts, a portable binary codec and
//! minimal-denominator rational approximation.
//!
//! This crate re-exports the public surface of `mpnum-memory`, `mpnum-core`
//! and `mpnum-codec`, and hosts the `mpnum` command-line tool.

pub mod app;
pub mod config;
pub mod errors;
pub mod settings;
pub mod version;

pub use mpnum_codec::{
    decode_float, decode_integer, decode_rational, encode_float, encode_integer, encode_rational,
    to_binary, value_from_binary, CodecError, FloatCode, Kind, Value,
};
pub use mpnum_core::{
    best_rational, cache_stats, clear_cache, clear_flags, current_context, get_cache,
    local_context, set_cache, set_context, simplest_fraction, with_context, Approximation,
    ApproxError, BigFloat, CacheStats, Condition, Conditions, Context, ContextError,
    ContextOverrides, LocalContext, Round, Tolerance,
};
pub use mpnum_memory::{CacheLimits, PoolError, PooledValue, ValuePool};
