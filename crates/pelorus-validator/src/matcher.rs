//! Weighted identifier matching rules
//!
//! Strongest signal wins: the final confidence is the maximum across
//! rule families, never a sum, so a weaker family cannot outrank a
//! stronger one.

use crate::config::ValidatorConfig;

/// How many sources matched one identifier family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCounts {
    /// Total matching sources
    pub total: usize,

    /// Matching sources whose domain is authoritative (T1)
    pub authoritative: usize,
}

impl MatchCounts {
    /// Record one matching source
    pub fn record(&mut self, authoritative: bool) {
        self.total += 1;
        if authoritative {
            self.authoritative += 1;
        }
    }
}

/// Confidence for a primary-identifier (IMO) match count
pub fn primary_confidence(counts: MatchCounts, config: &ValidatorConfig) -> Option<f64> {
    match (counts.total, counts.authoritative) {
        (0, _) => None,
        (total, auth) if total >= 3 && auth >= 2 => Some(config.primary_strong),
        (total, _) if total >= 2 => Some(config.primary_moderate),
        (1, 1) => Some(config.primary_single_authoritative),
        (1, _) => Some(config.primary_single),
        _ => None,
    }
}

/// Confidence for a secondary-identifier (MMSI / call sign) match count
pub fn secondary_confidence(counts: MatchCounts, config: &ValidatorConfig) -> Option<f64> {
    match (counts.total, counts.authoritative) {
        (0, _) => None,
        (total, auth) if total >= 3 && auth >= 2 => Some(config.secondary_strong),
        (total, _) if total >= 2 => Some(config.secondary_moderate),
        (1, _) => Some(config.secondary_single),
        _ => None,
    }
}

/// Confidence for a name-only match count
pub fn name_confidence(counts: MatchCounts, config: &ValidatorConfig) -> Option<f64> {
    match counts.total {
        0 => None,
        1 => Some(config.name_single),
        _ => Some(config.name_moderate),
    }
}
