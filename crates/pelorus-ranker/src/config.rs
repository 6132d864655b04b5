//! Configuration for the Source Aggregator & Ranker

use serde::{Deserialize, Serialize};

/// Configuration for aggregation and ranking
///
/// Weights are empirically chosen constants; override them through
/// configuration rather than editing the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Maximum sources kept after ranking
    pub max_sources: usize,

    /// Weight of textual relevance in the composite score
    pub relevance_weight: f64,

    /// Weight of the tier value in the composite score
    pub tier_weight: f64,

    /// Weight of the external content-intelligence signal
    pub intel_weight: f64,

    /// Tier value for T1 sources
    pub t1_value: f64,

    /// Tier value for T2 sources
    pub t2_value: f64,

    /// Tier value for T3 sources
    pub t3_value: f64,
}

impl RankerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_sources == 0 {
            return Err("max_sources must be greater than 0".to_string());
        }
        for (name, weight) in [
            ("relevance_weight", self.relevance_weight),
            ("tier_weight", self.tier_weight),
            ("intel_weight", self.intel_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(format!("{} must be within [0, 1]", name));
            }
        }
        Ok(())
    }
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            max_sources: 12,
            relevance_weight: 0.5,
            tier_weight: 0.3,
            intel_weight: 0.2,
            t1_value: 1.0,
            t2_value: 0.6,
            t3_value: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RankerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let mut config = RankerConfig::default();
        config.tier_weight = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_sources_rejected() {
        let mut config = RankerConfig::default();
        config.max_sources = 0;
        assert!(config.validate().is_err());
    }
}
