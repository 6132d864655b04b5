//! Pelorus Cache Layer
//!
//! Implements the `CacheStore` trait with two backends:
//!
//! - `MemoryCache`: mutex-guarded map, the default embedded backend and
//!   the workhorse for tests
//! - `SqliteCache`: durable single-table SQLite store with a JSON payload
//!   column
//!
//! Both backends share the required semantics: atomic get/put per key,
//! TTL expiry on read, last-write-wins under concurrent puts. Physical
//! eviction of expired rows is a maintenance concern (`purge_expired`),
//! not a correctness one.

#![warn(missing_docs)]

pub mod memory;
mod records;
pub mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;
