//! SQLite cache backend

use crate::records::EntryPayload;
use async_trait::async_trait;
use pelorus_domain::cache::unix_now;
use pelorus_domain::traits::{CacheError, CacheStore};
use pelorus_domain::CacheEntry;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

/// Durable SQLite-backed cache
///
/// One row per key with a JSON payload column. `INSERT OR REPLACE` gives
/// last-write-wins semantics; TTL expiry is checked on read, and
/// `purge_expired` physically evicts dead rows.
///
/// # Thread Safety
///
/// The connection is mutex-guarded; operations are short single-row
/// statements.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Create a cache at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pelorus_cache::SqliteCache;
    ///
    /// let cache = SqliteCache::new("pelorus-cache.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let conn = Connection::open(path)
            .map_err(|e| CacheError::Unavailable(format!("open failed: {}", e)))?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.initialize_schema()?;
        Ok(cache)
    }

    fn initialize_schema(&self) -> Result<(), CacheError> {
        let schema = include_str!("schema.sql");
        self.conn
            .lock()
            .unwrap()
            .execute_batch(schema)
            .map_err(|e| CacheError::Unavailable(format!("schema init failed: {}", e)))
    }

    /// Physically delete every logically expired row
    ///
    /// Returns the number of rows removed.
    pub fn purge_expired(&self) -> Result<usize, CacheError> {
        let now = unix_now() as i64;
        self.conn
            .lock()
            .unwrap()
            .execute(
                "DELETE FROM cache_entries WHERE ? - created_at > ttl_seconds",
                params![now],
            )
            .map_err(|e| CacheError::Unavailable(format!("purge failed: {}", e)))
    }
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let row: Option<(String, i64, i64)> = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT payload, created_at, ttl_seconds FROM cache_entries WHERE key = ?",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| CacheError::Unavailable(format!("get failed: {}", e)))?
        };

        let Some((payload_json, created_at, ttl_seconds)) = row else {
            return Ok(None);
        };

        let created_at = created_at.max(0) as u64;
        let ttl_seconds = ttl_seconds.max(0) as u64;

        if unix_now().saturating_sub(created_at) > ttl_seconds {
            // Logically deleted; leave physical eviction to purge_expired
            return Ok(None);
        }

        let payload: EntryPayload = serde_json::from_str(&payload_json).map_err(|e| {
            warn!(key, "dropping undecodable cache entry: {}", e);
            CacheError::Corrupt(format!("payload decode failed: {}", e))
        })?;

        Ok(Some(payload.into_entry(created_at, ttl_seconds)))
    }

    async fn put(
        &self,
        key: &str,
        mut entry: CacheEntry,
        ttl_seconds: u64,
    ) -> Result<(), CacheError> {
        entry.ttl_seconds = ttl_seconds;

        let payload = serde_json::to_string(&EntryPayload::from_entry(&entry))
            .map_err(|e| CacheError::Corrupt(format!("payload encode failed: {}", e)))?;

        self.conn
            .lock()
            .unwrap()
            .execute(
                "INSERT OR REPLACE INTO cache_entries (key, payload, created_at, ttl_seconds)
                 VALUES (?, ?, ?, ?)",
                params![key, payload, entry.created_at as i64, ttl_seconds as i64],
            )
            .map_err(|e| CacheError::Unavailable(format!("put failed: {}", e)))?;

        Ok(())
    }
}
