//! Parallel retrieval executor
//!
//! Runs one concurrent branch per budgeted sub-query: cache-first, then
//! the search provider through the retry executor. A branch that
//! exhausts its retries degrades to an empty result; the executor always
//! waits for every branch before returning the merged raw set.

use crate::metrics::RetrievalMetrics;
use crate::retry::{execute_with_retry, RetryPolicy};
use futures::future::join_all;
use pelorus_domain::traits::{CacheStore, ProgressSink, SearchProvider};
use pelorus_domain::{CacheEntry, Diagnostics, ProgressEvent, QueryPlan, Source, SubQuery};
use tracing::{debug, warn};

/// Cache key for one sub-query branch
///
/// Lowercased, whitespace-normalized query text joined with the entity
/// context; stable across runs so entries stay idempotent.
pub fn cache_key(query: &str, context: Option<&str>) -> String {
    let normalize =
        |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    format!("{}|{}", normalize(query), normalize(context.unwrap_or("")))
}

struct BranchOutcome {
    sources: Vec<Source>,
    cache_hit: bool,
    retries: u32,
    failed: bool,
}

/// Executes a query plan's branches concurrently
pub struct RetrievalExecutor<'a, S, C>
where
    S: SearchProvider,
    C: CacheStore,
{
    provider: &'a S,
    cache: &'a C,
    retry: RetryPolicy,
    cache_ttl_seconds: u64,
}

impl<'a, S, C> RetrievalExecutor<'a, S, C>
where
    S: SearchProvider,
    C: CacheStore,
{
    /// Create an executor over the given collaborators
    pub fn new(provider: &'a S, cache: &'a C, retry: RetryPolicy, cache_ttl_seconds: u64) -> Self {
        Self {
            provider,
            cache,
            retry,
            cache_ttl_seconds,
        }
    }

    /// Execute every branch of the plan and merge the raw results
    ///
    /// All branches run concurrently; the call returns once each has
    /// either resolved or degraded.
    pub async fn execute(
        &self,
        plan: &QueryPlan,
        entity_context: Option<&str>,
        sink: &dyn ProgressSink,
    ) -> (Vec<Source>, RetrievalMetrics) {
        let branches = plan
            .sub_queries
            .iter()
            .map(|sub_query| self.run_branch(sub_query, entity_context, sink));

        let outcomes = join_all(branches).await;

        let mut merged = Vec::new();
        let mut metrics = RetrievalMetrics::new();
        for outcome in outcomes {
            if outcome.cache_hit {
                metrics.record_cache_hit();
            } else {
                metrics.record_cache_miss();
            }
            metrics.record_retries(outcome.retries);
            if outcome.failed {
                metrics.record_failed_branch();
            }
            merged.extend(outcome.sources);
        }

        debug!(
            branches = plan.len(),
            sources = merged.len(),
            "retrieval round complete: {}",
            metrics.summary()
        );

        (merged, metrics)
    }

    async fn run_branch(
        &self,
        sub_query: &SubQuery,
        context: Option<&str>,
        sink: &dyn ProgressSink,
    ) -> BranchOutcome {
        let key = cache_key(&sub_query.text, context);

        match self.cache.get(&key).await {
            Ok(Some(entry)) => {
                debug!(query = %sub_query.text, "cache hit");
                return BranchOutcome {
                    sources: entry.sources,
                    cache_hit: true,
                    retries: 0,
                    failed: false,
                };
            }
            Ok(None) => {}
            Err(e) => {
                // Unreachable cache is an unconditional miss, never fatal
                warn!("cache read failed, treating as miss: {}", e);
            }
        }

        sink.emit(ProgressEvent::Searching {
            query: sub_query.text.clone(),
        });

        let outcome = execute_with_retry(&self.retry, || {
            self.provider.search(&sub_query.text, context)
        })
        .await;

        match outcome.result {
            Ok(sources) => {
                let entry = CacheEntry::new(
                    sources.clone(),
                    None,
                    Diagnostics::default(),
                    self.cache_ttl_seconds,
                );
                if let Err(e) = self.cache.put(&key, entry, self.cache_ttl_seconds).await {
                    warn!("cache write failed, continuing uncached: {}", e);
                }
                BranchOutcome {
                    sources,
                    cache_hit: false,
                    retries: outcome.retries,
                    failed: false,
                }
            }
            Err(e) => {
                warn!(query = %sub_query.text, "branch degraded to empty result: {}", e);
                BranchOutcome {
                    sources: Vec::new(),
                    cache_hit: false,
                    retries: outcome.retries,
                    failed: true,
                }
            }
        }
    }
}
