//! # mpnum-memory
//!
//! Free-list pools for multi-precision values.
//!
//! Short-lived integers, rationals and floats are parked in a bounded stack
//! when released and handed out again on the next acquire, which amortizes
//! the cost of their digit storage. Pools are plain single-owner values; the
//! per-thread cache that wraps them lives in `mpnum-core`.
#![warn(missing_docs)]

pub mod limits;
pub mod pool;
pub mod recycle;
pub mod stats;

pub use limits::{
    CacheLimits, PoolError, DEFAULT_CACHE_OBJECTS, DEFAULT_CACHE_OBJECT_WORDS, MAX_CACHE_OBJECTS,
    MAX_CACHE_OBJECT_WORDS,
};
pub use pool::{PooledValue, ValuePool};
pub use recycle::{Recycle, ValueKind};
pub use stats::PoolStats;
