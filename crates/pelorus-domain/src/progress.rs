//! Progress events emitted at pipeline checkpoints
//!
//! Events are purely observational. Sinks must never block or affect
//! pipeline control flow; a slow consumer sees dropped events, not a
//! stalled request.

/// A checkpoint event emitted while a request runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Query planning finished
    PlanningComplete {
        /// Number of budgeted sub-queries
        sub_queries: usize,
        /// Planning strategy used ("llm-guided" or "template")
        strategy: &'static str,
    },

    /// A sub-query is being searched
    Searching {
        /// The sub-query text
        query: String,
    },

    /// Aggregation and ranking finished
    RankingComplete {
        /// Raw source count before dedup
        total_found: usize,
        /// Source count after ranking and truncation
        total_ranked: usize,
    },

    /// Confidence score computed
    ConfidenceComputed {
        /// Clamped score in [0, 100]
        score: u8,
    },

    /// A reflexion iteration started
    ReflexionIteration {
        /// 1-based iteration number
        iteration: u32,
        /// Evidence gaps outstanding at iteration start
        gap_count: usize,
    },

    /// Retrieval metrics snapshot
    MetricsSnapshot {
        /// Cache hits this request
        cache_hits: u64,
        /// Cache misses this request
        cache_misses: u64,
        /// Total provider retries this request
        retries: u64,
    },
}
