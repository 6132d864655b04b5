//! Source aggregation: dedup, tier assignment, composite ranking

use crate::config::RankerConfig;
use crate::relevance::lexical_overlap_score;
use pelorus_domain::source::canonical_url;
use pelorus_domain::tier::{categorize, Tier};
use pelorus_domain::{Source, TierCounts};
use std::collections::HashMap;
use tracing::debug;

/// The ranked, deduplicated output of one aggregation round
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSet {
    /// Sources sorted by descending composite score, truncated to budget
    pub sources: Vec<Source>,

    /// Per-tier counts of the ranked sources
    pub tier_counts: TierCounts,

    /// `(total_found - total_ranked) / total_found`; 0 when nothing found
    pub dedup_percent: f64,

    /// Raw source count before deduplication
    pub total_found: usize,
}

impl RankedSet {
    /// Source count after dedup, ranking, and truncation
    pub fn total_ranked(&self) -> usize {
        self.sources.len()
    }
}

/// Aggregate raw sources from all sub-query branches into a ranked set
///
/// Steps: dedup by canonical URL (richer content wins on collision),
/// assign tiers via the domain categorizer, compute composite scores,
/// sort descending, truncate to `config.max_sources`.
pub fn aggregate(raw_sources: Vec<Source>, query: &str, config: &RankerConfig) -> RankedSet {
    let total_found = raw_sources.len();

    // 1. Deduplicate by canonical URL, keeping the richer instance
    let mut order: Vec<Source> = Vec::new();
    let mut index_by_url: HashMap<String, usize> = HashMap::new();

    for source in raw_sources {
        let key = canonical_url(&source.url);
        match index_by_url.get(&key).copied() {
            Some(idx) => {
                if source.content.len() > order[idx].content.len() {
                    order[idx] = source;
                }
            }
            None => {
                index_by_url.insert(key, order.len());
                order.push(source);
            }
        }
    }

    // 2. Tier assignment and 3. composite scoring
    for source in &mut order {
        source.tier = categorize(&source.url);
        source.rank_score = composite_score(source, query, config);
    }

    // 4. Sort descending by composite score (stable for equal scores)
    order.sort_by(|a, b| {
        b.rank_score
            .partial_cmp(&a.rank_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // 5. Truncate to the display budget
    order.truncate(config.max_sources);

    let mut tier_counts = TierCounts::default();
    for source in &order {
        match source.tier {
            Tier::T1 => tier_counts.t1 += 1,
            Tier::T2 => tier_counts.t2 += 1,
            Tier::T3 => tier_counts.t3 += 1,
        }
    }

    let dedup_percent = if total_found > 0 {
        (total_found - order.len()) as f64 / total_found as f64
    } else {
        0.0
    };

    debug!(
        total_found,
        total_ranked = order.len(),
        dedup_percent,
        "aggregation complete"
    );

    RankedSet {
        sources: order,
        tier_counts,
        dedup_percent,
        total_found,
    }
}

fn composite_score(source: &Source, query: &str, config: &RankerConfig) -> f64 {
    let haystack = format!("{} {}", source.title, source.content);
    let relevance = lexical_overlap_score(query, &haystack);

    let tier_value = match source.tier {
        Tier::T1 => config.t1_value,
        Tier::T2 => config.t2_value,
        Tier::T3 => config.t3_value,
    };

    let intel = source.intel_score.unwrap_or(0.0).clamp(0.0, 1.0);

    relevance * config.relevance_weight
        + tier_value * config.tier_weight
        + intel * config.intel_weight
}
