//! Bounded free-list pool for multi-precision values.
//!
//! A `ValuePool<T>` is a stack of parked values of a single kind. `acquire`
//! pops a parked value or allocates a fresh one; `release` parks the value
//! unless the stack is at its depth bound or the value holds more words than
//! the size bound, in which case it is dropped. Pools have no internal
//! locking: each one has exactly one owner.

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use crate::limits::CacheLimits;
use crate::recycle::Recycle;
use crate::stats::PoolStats;

/// A value handed out by a pool.
///
/// Besides the value itself, the handle carries owner-private transient
/// state (a lazily computed hash) that is cleared before the value is
/// parked again. Mutable access invalidates the cached hash.
#[derive(Debug)]
pub struct PooledValue<T> {
    value: T,
    hash: Cell<Option<u64>>,
}

impl<T> PooledValue<T> {
    /// Wrap an owned value.
    pub fn new(value: T) -> Self {
        Self {
            value,
            hash: Cell::new(None),
        }
    }

    /// Unwrap the value, giving up the handle.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Replace the wrapped value.
    pub fn set(&mut self, value: T) {
        self.hash.set(None);
        self.value = value;
    }

    /// The cached hash, if one has been computed since the last mutation.
    pub fn cached_hash(&self) -> Option<u64> {
        self.hash.get()
    }

    fn clear_transient(&mut self) {
        self.hash.set(None);
    }
}

impl<T: Hash> PooledValue<T> {
    /// Hash of the wrapped value, computed once and cached.
    pub fn hash_value(&self) -> u64 {
        if let Some(h) = self.hash.get() {
            return h;
        }
        let mut hasher = DefaultHasher::new();
        self.value.hash(&mut hasher);
        let h = hasher.finish();
        self.hash.set(Some(h));
        h
    }
}

impl<T> Deref for PooledValue<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for PooledValue<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.hash.set(None);
        &mut self.value
    }
}

impl<T> From<T> for PooledValue<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Free-list pool of one value kind.
#[derive(Debug)]
pub struct ValuePool<T> {
    free: Vec<PooledValue<T>>,
    limits: CacheLimits,
    stats: PoolStats,
}

impl<T: Recycle> ValuePool<T> {
    /// Create an empty pool with the given bounds.
    #[must_use]
    pub fn new(limits: CacheLimits) -> Self {
        Self {
            free: Vec::with_capacity(limits.max_objects),
            limits,
            stats: PoolStats::default(),
        }
    }

    /// Take a value from the free list, or allocate a fresh one.
    ///
    /// The contents of a reused value are unspecified; callers initialize it.
    pub fn acquire(&mut self) -> PooledValue<T> {
        if let Some(value) = self.free.pop() {
            self.stats.record_hit();
            return value;
        }
        self.stats.record_miss();
        PooledValue::new(T::fresh())
    }

    /// Give a value back. It is parked if the pool has room and the value is
    /// within the size bound, dropped otherwise.
    pub fn release(&mut self, mut value: PooledValue<T>) {
        if self.free.len() >= self.limits.max_objects || !self.limits.admits(value.words()) {
            self.stats.record_eviction();
            return;
        }
        value.clear_transient();
        value.value.recycle();
        self.free.push(value);
    }

    /// Apply new bounds. Parked values beyond the new depth are dropped now;
    /// the size bound only applies to later releases.
    pub fn resize(&mut self, limits: CacheLimits) {
        if self.free.len() > limits.max_objects {
            let excess = self.free.len() - limits.max_objects;
            self.free.truncate(limits.max_objects);
            self.free.shrink_to(limits.max_objects);
            self.stats.record_trim(excess);
            tracing::debug!(kind = %T::KIND, dropped = excess, "trimmed value pool");
        }
        self.limits = limits;
    }

    /// Current bounds.
    #[must_use]
    pub fn limits(&self) -> CacheLimits {
        self.limits
    }

    /// Number of parked values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Whether the free list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Largest word count among parked values.
    #[must_use]
    pub fn largest_parked_words(&self) -> usize {
        self.free.iter().map(|v| v.words()).max().unwrap_or(0)
    }

    /// Snapshot of the usage counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Reset the usage counters.
    pub fn reset_stats(&mut self) {
        self.stats = PoolStats::default();
    }

    /// Drop every parked value.
    pub fn clear(&mut self) {
        let count = self.free.len();
        self.free.clear();
        self.stats.record_trim(count);
    }
}

impl<T: Recycle> Default for ValuePool<T> {
    fn default() -> Self {
        Self::new(CacheLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use num_traits::Zero;

    use super::*;

    fn limits(objects: i64, words: i64) -> CacheLimits {
        CacheLimits::new(objects, words).unwrap()
    }

    #[test]
    fn acquire_release() {
        let mut pool: ValuePool<BigInt> = ValuePool::default();
        let value = pool.acquire();
        assert!(value.is_zero());
        pool.release(value);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn reuse_counts_as_hit() {
        let mut pool: ValuePool<BigInt> = ValuePool::default();
        let v = pool.acquire();
        pool.release(v);
        let _ = pool.acquire();
        let stats = pool.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn release_clears_value_and_hash() {
        let mut pool: ValuePool<BigInt> = ValuePool::default();
        let mut v = pool.acquire();
        v.set(BigInt::from(42));
        let _ = v.hash_value();
        assert!(v.cached_hash().is_some());
        pool.release(v);
        let v = pool.acquire();
        assert!(v.cached_hash().is_none());
        assert!(v.is_zero());
    }

    #[test]
    fn mutation_invalidates_hash() {
        let mut v = PooledValue::new(BigInt::from(7));
        let h7 = v.hash_value();
        *v += 1;
        assert!(v.cached_hash().is_none());
        assert_ne!(v.hash_value(), h7);
    }

    #[test]
    fn full_pool_evicts() {
        let mut pool: ValuePool<BigInt> = ValuePool::new(limits(2, 128));
        pool.release(PooledValue::new(BigInt::from(1)));
        pool.release(PooledValue::new(BigInt::from(2)));
        pool.release(PooledValue::new(BigInt::from(3)));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.stats().evictions, 1);
    }

    #[test]
    fn oversized_value_is_not_parked() {
        let mut pool: ValuePool<BigInt> = ValuePool::new(limits(4, 1));
        pool.release(PooledValue::new(BigInt::from(1) << 128));
        assert!(pool.is_empty());
        assert_eq!(pool.stats().evictions, 1);
    }

    #[test]
    fn zero_depth_disables_caching() {
        let mut pool: ValuePool<BigInt> = ValuePool::new(CacheLimits::disabled());
        let v = pool.acquire();
        pool.release(v);
        assert!(pool.is_empty());
        let _ = pool.acquire();
        assert_eq!(pool.stats().hits, 0);
        assert_eq!(pool.stats().misses, 2);
    }

    #[test]
    fn shrinking_resize_trims() {
        let mut pool: ValuePool<BigInt> = ValuePool::new(limits(8, 128));
        for i in 0..6 {
            pool.release(PooledValue::new(BigInt::from(i)));
        }
        pool.resize(limits(2, 128));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.stats().trimmed, 4);
    }

    #[test]
    fn size_bound_is_prospective() {
        let mut pool: ValuePool<BigInt> = ValuePool::new(limits(8, 128));
        let mut big = pool.acquire();
        big.set(BigInt::from(1) << 200);
        // Parked value is cleared on release, so only new releases are checked.
        pool.release(big);
        pool.resize(limits(8, 1));
        assert_eq!(pool.len(), 1);
        pool.release(PooledValue::new(BigInt::from(1) << 200));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let mut pool: ValuePool<BigInt> = ValuePool::default();
        pool.release(PooledValue::new(BigInt::from(1)));
        pool.release(PooledValue::new(BigInt::from(2)));
        pool.clear();
        assert!(pool.is_empty());
        assert_eq!(pool.stats().trimmed, 2);
    }

    #[test]
    fn reset_stats() {
        let mut pool: ValuePool<BigInt> = ValuePool::default();
        let _ = pool.acquire();
        pool.reset_stats();
        assert_eq!(pool.stats(), PoolStats::default());
    }
}
