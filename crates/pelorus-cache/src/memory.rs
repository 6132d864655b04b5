//! In-memory cache backend

use async_trait::async_trait;
use pelorus_domain::cache::unix_now;
use pelorus_domain::traits::{CacheError, CacheStore};
use pelorus_domain::CacheEntry;
use std::collections::HashMap;
use std::sync::Mutex;

/// Sweep the whole map for expired entries once this many puts have occurred
const SWEEP_EVERY_PUTS: usize = 64;

/// Mutex-guarded in-memory cache with TTL expiry on read
///
/// The default embedded backend. Expired entries read as absent; the map
/// is swept opportunistically on writes so long-running processes don't
/// accumulate dead entries.
#[derive(Debug, Default)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    puts_since_sweep: usize,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) entries
    pub fn len(&self) -> usize {
        let now = unix_now();
        let inner = self.inner.lock().unwrap();
        inner
            .entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Whether the cache holds no live entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry now
    pub fn purge_expired(&self) {
        let now = unix_now();
        let mut inner = self.inner.lock().unwrap();
        inner.entries.retain(|_, entry| !entry.is_expired(now));
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let now = unix_now();
        let mut inner = self.inner.lock().unwrap();
        if let Some(entry) = inner.entries.get(key) {
            if !entry.is_expired(now) {
                return Ok(Some(entry.clone()));
            }
        } else {
            return Ok(None);
        }
        // expired: physically drop it on the way out
        inner.entries.remove(key);
        Ok(None)
    }

    async fn put(
        &self,
        key: &str,
        mut entry: CacheEntry,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        entry.ttl_seconds = ttl_seconds;

        let mut inner = self.inner.lock().unwrap();
        inner.entries.insert(key.to_string(), entry);

        inner.puts_since_sweep += 1;
        if inner.puts_since_sweep >= SWEEP_EVERY_PUTS {
            let now = unix_now();
            inner.entries.retain(|_, e| !e.is_expired(now));
            inner.puts_since_sweep = 0;
        }

        Ok(())
    }
}
