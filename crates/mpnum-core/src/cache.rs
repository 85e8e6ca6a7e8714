//! Per-thread cache of recycled integers, rationals and floats.
//!
//! One [`ValueCache`] lives in each thread. It holds a pool per value kind,
//! all governed by the same [`CacheLimits`]. The free functions here work on
//! the calling thread's cache.

use std::cell::RefCell;

use num_bigint::BigInt;
use num_rational::BigRational;

use mpnum_memory::{
    CacheLimits, PoolError, PoolStats, PooledValue, Recycle, ValueKind, ValuePool,
};

use crate::constants::DEFAULT_PRECISION;
use crate::float::BigFloat;

impl Recycle for BigFloat {
    const KIND: ValueKind = ValueKind::Float;

    fn fresh() -> Self {
        BigFloat::zero(false, DEFAULT_PRECISION)
    }

    fn words(&self) -> usize {
        usize::try_from(u64::from(self.prec()).div_ceil(64)).unwrap_or(usize::MAX)
    }

    fn recycle(&mut self) {
        self.clear();
    }
}

/// Usage counters of the three pools of a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub integers: PoolStats,
    pub rationals: PoolStats,
    pub floats: PoolStats,
}

impl CacheStats {
    /// Counters of all three pools added together.
    #[must_use]
    pub fn total(&self) -> PoolStats {
        self.integers.merged(self.rationals).merged(self.floats)
    }
}

/// One pool per value kind under shared limits.
#[derive(Debug, Default)]
pub struct ValueCache {
    integers: ValuePool<BigInt>,
    rationals: ValuePool<BigRational>,
    floats: ValuePool<BigFloat>,
}

impl ValueCache {
    #[must_use]
    pub fn new(limits: CacheLimits) -> Self {
        Self {
            integers: ValuePool::new(limits),
            rationals: ValuePool::new(limits),
            floats: ValuePool::new(limits),
        }
    }

    #[must_use]
    pub fn limits(&self) -> CacheLimits {
        self.integers.limits()
    }

    /// Apply new limits to every pool, returning the previous ones.
    pub fn set_limits(&mut self, limits: CacheLimits) -> CacheLimits {
        let previous = self.limits();
        self.integers.resize(limits);
        self.rationals.resize(limits);
        self.floats.resize(limits);
        previous
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            integers: self.integers.stats(),
            rationals: self.rationals.stats(),
            floats: self.floats.stats(),
        }
    }

    /// Drop every parked value.
    pub fn clear(&mut self) {
        self.integers.clear();
        self.rationals.clear();
        self.floats.clear();
    }

    /// The pool for values of type `T`.
    pub fn pool<T: Cached>(&mut self) -> &mut ValuePool<T> {
        T::pool(self)
    }
}

/// A value type with a pool in [`ValueCache`].
pub trait Cached: Recycle {
    fn pool(cache: &mut ValueCache) -> &mut ValuePool<Self>;
}

impl Cached for BigInt {
    fn pool(cache: &mut ValueCache) -> &mut ValuePool<Self> {
        &mut cache.integers
    }
}

impl Cached for BigRational {
    fn pool(cache: &mut ValueCache) -> &mut ValuePool<Self> {
        &mut cache.rationals
    }
}

impl Cached for BigFloat {
    fn pool(cache: &mut ValueCache) -> &mut ValuePool<Self> {
        &mut cache.floats
    }
}

thread_local! {
    static CACHE: RefCell<ValueCache> = RefCell::new(ValueCache::default());
}

/// Set the limits of this thread's cache and return the previous
/// `(max_objects, max_object_words)`.
///
/// Out-of-range arguments leave the cache unchanged.
pub fn set_cache(max_objects: i64, max_object_words: i64) -> Result<(usize, usize), PoolError> {
    let limits = CacheLimits::new(max_objects, max_object_words)?;
    let previous = CACHE.with(|cache| cache.borrow_mut().set_limits(limits));
    tracing::debug!(
        max_objects = limits.max_objects,
        max_object_words = limits.max_object_words,
        "cache limits updated"
    );
    Ok(previous.as_pair())
}

/// Current `(max_objects, max_object_words)` of this thread's cache.
pub fn get_cache() -> (usize, usize) {
    CACHE.with(|cache| cache.borrow().limits().as_pair())
}

/// Take a value of type `T` from this thread's cache.
///
/// Falls back to a fresh value when the cache is unavailable (thread
/// teardown or a nested borrow).
pub fn acquire<T: Cached>() -> PooledValue<T> {
    CACHE
        .try_with(|cache| {
            cache
                .try_borrow_mut()
                .ok()
                .map(|mut cache| cache.pool::<T>().acquire())
        })
        .ok()
        .flatten()
        .unwrap_or_else(|| PooledValue::new(T::fresh()))
}

/// Give a value back to this thread's cache.
pub fn release<T: Cached>(value: PooledValue<T>) {
    let _ = CACHE.try_with(move |cache| {
        if let Ok(mut cache) = cache.try_borrow_mut() {
            cache.pool::<T>().release(value);
        }
    });
}

/// Usage counters of this thread's cache.
pub fn cache_stats() -> CacheStats {
    CACHE.with(|cache| cache.borrow().stats())
}

/// Drop every value parked in this thread's cache.
pub fn clear_cache() {
    CACHE.with(|cache| cache.borrow_mut().clear());
}
