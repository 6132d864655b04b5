//! Cache entry module - TTL-bearing retrieval result blobs

use crate::diagnostics::Diagnostics;
use crate::source::Source;
use std::time::{SystemTime, UNIX_EPOCH};

/// A keyed, TTL-bearing retrieval result
///
/// Created once on a retrieval cache-miss after results are ranked and
/// read-only afterward. An entry is logically deleted when
/// `now - created_at > ttl_seconds`; the store may physically evict
/// independently. Entries for a given key are idempotent, so concurrent
/// last-write-wins races are harmless.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Ranked sources for the cached query
    pub sources: Vec<Source>,

    /// Synthesized answer text, if one was produced
    pub answer: Option<String>,

    /// Diagnostics captured at ranking time
    pub diagnostics: Diagnostics,

    /// Unix timestamp (seconds) at creation
    pub created_at: u64,

    /// Time-to-live in seconds
    pub ttl_seconds: u64,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(
        sources: Vec<Source>,
        answer: Option<String>,
        diagnostics: Diagnostics,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            sources,
            answer,
            diagnostics,
            created_at: unix_now(),
            ttl_seconds,
        }
    }

    /// Age of the entry in seconds relative to `now`
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    /// Whether the entry is logically expired at `now`
    pub fn is_expired(&self, now: u64) -> bool {
        self.age(now) > self.ttl_seconds
    }
}

/// Current Unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
