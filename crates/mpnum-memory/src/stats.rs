//! Pool usage counters.

/// Counters describing how a pool has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquires served from the free list.
    pub hits: u64,
    /// Acquires that needed a fresh allocation.
    pub misses: u64,
    /// Releases that dropped the value (pool full or value too large).
    pub evictions: u64,
    /// Values dropped by a shrinking resize or a clear.
    pub trimmed: u64,
}

impl PoolStats {
    /// Record an acquire served from the free list.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Record an acquire that allocated.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Record a release that dropped its value.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Record `count` values dropped by a resize or clear.
    pub fn record_trim(&mut self, count: usize) {
        self.trimmed += count as u64;
    }

    /// Fraction of acquires served from the free list.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Combine the counters of two pools.
    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        Self {
            hits: self.hits + other.hits,
            misses: self.misses + other.misses,
            evictions: self.evictions + other.evictions,
            trimmed: self.trimmed + other.trimmed,
        }
    }
}
