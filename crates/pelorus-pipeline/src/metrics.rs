//! Metrics collection for retrieval operations

/// Metrics collected while executing one request's retrieval rounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievalMetrics {
    /// Sub-query branches answered from cache
    pub cache_hits: u64,

    /// Sub-query branches that went to the provider
    pub cache_misses: u64,

    /// Total provider retries across all branches
    pub retries: u64,

    /// Branches that exhausted retries and degraded to empty
    pub failed_branches: u64,
}

impl RetrievalMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a branch served from cache
    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    /// Record a branch that missed the cache
    pub fn record_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    /// Record retries performed by one branch
    pub fn record_retries(&mut self, count: u32) {
        self.retries += u64::from(count);
    }

    /// Record a branch that degraded to an empty result
    pub fn record_failed_branch(&mut self) {
        self.failed_branches += 1;
    }

    /// Fold another round's metrics into this one
    pub fn merge(&mut self, other: &RetrievalMetrics) {
        self.cache_hits += other.cache_hits;
        self.cache_misses += other.cache_misses;
        self.retries += other.retries;
        self.failed_branches += other.failed_branches;
    }

    /// Generate a summary line for logging
    pub fn summary(&self) -> String {
        format!(
            "cache {}/{} hit/miss, {} retries, {} failed branches",
            self.cache_hits, self.cache_misses, self.retries, self.failed_branches
        )
    }
}
