//! Counters for understanding how well the cache is doing.

/// Per-presenter cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served from a cached value.
    pub hits: u64,
    /// Reads that had to call the factory.
    pub misses: u64,
    /// Cached values dropped by list updates.
    pub invalidated: u64,
    /// List updates applied.
    pub updates: u64,
}

impl CacheStats {
    #[inline]
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    #[inline]
    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        return self.hits as f64 / total as f64 * 100.0;
    }

    pub fn reset(&mut self) {
        *self = CacheStats::default();
    }

    pub fn report(&self) -> String {
        return format!(
            "Cache: {}/{} ({:.1}% hit), Updates: {}, Invalidated: {}",
            self.hits,
            self.hits + self.misses,
            self.hit_rate(),
            self.updates,
            self.invalidated
        );
    }
}
