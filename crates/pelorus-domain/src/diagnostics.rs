//! Pipeline diagnostics payload
//!
//! Field names here are stable: downstream consumers read them by name.

/// Per-tier source counts after ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    /// T1 (registries, class societies, AIS trackers)
    pub t1: usize,

    /// T2 (trade press, forums)
    pub t2: usize,

    /// T3 (generic, commercial)
    pub t3: usize,
}

impl TierCounts {
    /// Total sources across all tiers
    pub fn total(&self) -> usize {
        self.t1 + self.t2 + self.t3
    }
}

/// Diagnostics describing one retrieval/ranking round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Ranked source counts per tier
    pub tier_counts: TierCounts,

    /// `(raw - deduplicated) / raw`; 0 when no raw sources
    pub dedup_percent: f64,

    /// Raw source count before deduplication
    pub total_found: usize,

    /// Source count after dedup, ranking, and truncation
    pub total_ranked: usize,

    /// Reflexion iterations executed for the request
    pub reflexion_iterations: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_counts_total() {
        let counts = TierCounts { t1: 2, t2: 3, t3: 1 };
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn test_default_diagnostics() {
        let diag = Diagnostics::default();
        assert_eq!(diag.total_found, 0);
        assert_eq!(diag.dedup_percent, 0.0);
    }
}
