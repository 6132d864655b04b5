//! Pelorus Source Aggregator & Ranker
//!
//! Merges raw sources from all sub-query branches, deduplicates by
//! canonical URL, assigns authority tiers, computes a composite rank
//! score, and truncates to the configured display budget.
//!
//! Ranking is pure: no I/O, no hidden state, deterministic for a given
//! input and configuration.

#![warn(missing_docs)]

pub mod aggregator;
pub mod config;
pub mod relevance;

pub use aggregator::{aggregate, RankedSet};
pub use config::RankerConfig;
