//! Cache bounds and their validation.

/// Largest accepted pool depth.
pub const MAX_CACHE_OBJECTS: usize = 1000;

/// Largest accepted per-object size bound, in 64-bit words.
pub const MAX_CACHE_OBJECT_WORDS: usize = 16_384;

/// Default pool depth.
pub const DEFAULT_CACHE_OBJECTS: usize = 100;

/// Default per-object size bound, in 64-bit words.
pub const DEFAULT_CACHE_OBJECT_WORDS: usize = 128;

/// Errors raised while configuring a pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Requested depth is outside `0..=MAX_CACHE_OBJECTS`.
    #[error("cache size must be between 0 and 1000, got {0}")]
    InvalidCacheSize(i64),

    /// Requested object size bound is outside `0..=MAX_CACHE_OBJECT_WORDS`.
    #[error("object size must be between 0 and 16384 words, got {0}")]
    InvalidObjectSize(i64),
}

/// Depth and size bounds shared by the pools of one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
    /// Maximum number of parked objects per pool. Zero disables caching.
    pub max_objects: usize,
    /// Objects holding more words than this are never parked.
    pub max_object_words: usize,
}

impl CacheLimits {
    /// Validate host-supplied bounds.
    ///
    /// Signed inputs are accepted so that a negative request from a host is
    /// reported as an invalid argument rather than wrapping.
    pub fn new(max_objects: i64, max_object_words: i64) -> Result<Self, PoolError> {
        let objects = usize::try_from(max_objects)
            .ok()
            .filter(|&n| n <= MAX_CACHE_OBJECTS)
            .ok_or(PoolError::InvalidCacheSize(max_objects))?;
        let words = usize::try_from(max_object_words)
            .ok()
            .filter(|&n| n <= MAX_CACHE_OBJECT_WORDS)
            .ok_or(PoolError::InvalidObjectSize(max_object_words))?;
        Ok(Self {
            max_objects: objects,
            max_object_words: words,
        })
    }

    /// Limits with caching turned off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_objects: 0,
            max_object_words: DEFAULT_CACHE_OBJECT_WORDS,
        }
    }

    /// Whether an object of `words` words may be parked.
    #[must_use]
    pub fn admits(&self, words: usize) -> bool {
        words <= self.max_object_words
    }

    /// The bounds as a `(max_objects, max_object_words)` pair.
    #[must_use]
    pub fn as_pair(&self) -> (usize, usize) {
        (self.max_objects, self.max_object_words)
    }
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            max_objects: DEFAULT_CACHE_OBJECTS,
            max_object_words: DEFAULT_CACHE_OBJECT_WORDS,
        }
    }
}
