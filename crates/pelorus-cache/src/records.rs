//! Serializable row records for the SQLite payload column
//!
//! The domain crate stays serde-free, so the cache layer maps domain
//! values to its own records at the storage boundary.

use pelorus_domain::tier::Tier;
use pelorus_domain::{CacheEntry, Diagnostics, Source, TierCounts};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SourceRecord {
    title: String,
    url: String,
    content: String,
    rank_score: f64,
    tier: String,
    intel_score: Option<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct DiagnosticsRecord {
    t1: usize,
    t2: usize,
    t3: usize,
    dedup_percent: f64,
    total_found: usize,
    total_ranked: usize,
    reflexion_iterations: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EntryPayload {
    sources: Vec<SourceRecord>,
    answer: Option<String>,
    diagnostics: DiagnosticsRecord,
}

impl From<&Source> for SourceRecord {
    fn from(source: &Source) -> Self {
        Self {
            title: source.title.clone(),
            url: source.url.clone(),
            content: source.content.clone(),
            rank_score: source.rank_score,
            tier: source.tier.as_str().to_string(),
            intel_score: source.intel_score,
        }
    }
}

impl SourceRecord {
    fn into_source(self) -> Source {
        let mut source = Source::new(self.title, self.url, self.content);
        source.rank_score = self.rank_score;
        source.tier = Tier::parse(&self.tier).unwrap_or(Tier::T3);
        source.intel_score = self.intel_score;
        source
    }
}

impl From<&Diagnostics> for DiagnosticsRecord {
    fn from(diag: &Diagnostics) -> Self {
        Self {
            t1: diag.tier_counts.t1,
            t2: diag.tier_counts.t2,
            t3: diag.tier_counts.t3,
            dedup_percent: diag.dedup_percent,
            total_found: diag.total_found,
            total_ranked: diag.total_ranked,
            reflexion_iterations: diag.reflexion_iterations,
        }
    }
}

impl DiagnosticsRecord {
    fn into_diagnostics(self) -> Diagnostics {
        Diagnostics {
            tier_counts: TierCounts {
                t1: self.t1,
                t2: self.t2,
                t3: self.t3,
            },
            dedup_percent: self.dedup_percent,
            total_found: self.total_found,
            total_ranked: self.total_ranked,
            reflexion_iterations: self.reflexion_iterations,
        }
    }
}

impl EntryPayload {
    pub(crate) fn from_entry(entry: &CacheEntry) -> Self {
        Self {
            sources: entry.sources.iter().map(SourceRecord::from).collect(),
            answer: entry.answer.clone(),
            diagnostics: DiagnosticsRecord::from(&entry.diagnostics),
        }
    }

    pub(crate) fn into_entry(self, created_at: u64, ttl_seconds: u64) -> CacheEntry {
        CacheEntry {
            sources: self.sources.into_iter().map(SourceRecord::into_source).collect(),
            answer: self.answer,
            diagnostics: self.diagnostics.into_diagnostics(),
            created_at,
            ttl_seconds,
        }
    }
}
