//! LRU cache of query embeddings.
//!
//! Query embeddings depend only on the query text and the provider, never on
//! the index contents, so entries stay valid across index rebuilds. Repeated
//! screening runs with the same job description skip the embedding call.

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

/// Default cache size for query embeddings (number of distinct queries)
pub const DEFAULT_QUERY_CACHE_SIZE: usize = 128;

/// Cache statistics for monitoring and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe LRU cache of query embeddings.
///
/// All operations are non-blocking (try-lock); contention degrades to a miss.
pub struct QueryCache {
    entries: Mutex<LruCache<u64, Vec<f32>>>,
    stats: Mutex<CacheStats>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_CACHE_SIZE)
    }
}

impl QueryCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    fn key(provider: &str, text: &str) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        provider.hash(&mut hasher);
        text.hash(&mut hasher);
        hasher.finish()
    }

    /// Returns None if not cached or the cache is locked.
    pub fn get(&self, provider: &str, text: &str) -> Option<Vec<f32>> {
        let key = Self::key(provider, text);
        let mut cache = self.entries.try_lock().ok()?;
        let mut stats = self.stats.try_lock().ok()?;

        if let Some(embedding) = cache.get(&key) {
            stats.hits += 1;
            Some(embedding.clone())
        } else {
            stats.misses += 1;
            None
        }
    }

    /// Silently skips if the cache is locked.
    pub fn put(&self, provider: &str, text: &str, embedding: Vec<f32>) {
        let key = Self::key(provider, text);
        if let Ok(mut cache) = self.entries.try_lock() {
            cache.put(key, embedding);
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
            .try_lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.try_lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.entries.try_lock() {
            cache.clear();
        }
        if let Ok(mut stats) = self.stats.try_lock() {
            *stats = CacheStats::default();
        }
    }
}
