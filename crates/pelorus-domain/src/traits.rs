//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Infrastructure implementations live in other crates.

use crate::cache::CacheEntry;
use crate::progress::ProgressEvent;
use crate::source::Source;
use async_trait::async_trait;
use std::fmt;

/// Error from a search/grounding provider call
///
/// The retry executor retries only transient classes; `InvalidQuery` is
/// permanent and fails the branch immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Network-level failure (connection refused, DNS, TLS)
    Network(String),

    /// The call exceeded its deadline
    Timeout,

    /// The provider rejected the call for rate limiting
    RateLimited,

    /// Provider-side failure (5xx and similar)
    Provider(String),

    /// The query itself was rejected; retrying cannot help
    InvalidQuery(String),
}

impl SearchError {
    /// Whether the retry executor may retry this error
    pub fn is_transient(&self) -> bool {
        !matches!(self, SearchError::InvalidQuery(_))
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Network(msg) => write!(f, "network error: {}", msg),
            SearchError::Timeout => write!(f, "search call timed out"),
            SearchError::RateLimited => write!(f, "rate limited by provider"),
            SearchError::Provider(msg) => write!(f, "provider error: {}", msg),
            SearchError::InvalidQuery(msg) => write!(f, "invalid query: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

/// Error from the cache store
///
/// Treated as an unconditional cache-miss by the pipeline; never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The store could not be reached
    Unavailable(String),

    /// A stored entry could not be decoded
    Corrupt(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Unavailable(msg) => write!(f, "cache unavailable: {}", msg),
            CacheError::Corrupt(msg) => write!(f, "cache entry corrupt: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

/// Trait for the search/grounding provider
///
/// Implemented by the infrastructure layer; mocked in tests.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Execute one search call, returning raw sources
    async fn search(&self, query: &str, context: Option<&str>)
        -> Result<Vec<Source>, SearchError>;
}

/// Trait for the keyed, TTL-bearing cache store
///
/// Implementations must provide atomic get/put semantics per key.
/// Concurrent writers to the same key may race; last-write-wins is
/// acceptable because entries are idempotent for a given key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get an entry by key; expired entries read as `None`
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Store an entry under a key with a TTL in seconds
    async fn put(&self, key: &str, entry: CacheEntry, ttl_seconds: u64)
        -> Result<(), CacheError>;
}

/// Trait for the assisting language-model call
///
/// The model's output is expected, but not guaranteed, to be parseable
/// structured text; callers must validate it and degrade gracefully.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for completion operations
    type Error: fmt::Display + Send;

    /// Generate a text completion for the given prompt
    async fn complete(&self, prompt: &str) -> Result<String, Self::Error>;
}

/// Fire-and-forget progress/status sink
///
/// Called at defined pipeline checkpoints. Implementations must never
/// block and must never affect control flow.
pub trait ProgressSink: Send + Sync {
    /// Emit one event; dropping it is acceptable, blocking is not
    fn emit(&self, event: ProgressEvent);
}
