//! Pipeline configuration
//!
//! All empirically chosen constants live here as named, overridable
//! values. Validation happens fail-fast at pipeline construction; a bad
//! configuration never accepts a request.

use crate::retry::RetryPolicy;
use pelorus_citation::CitationPolicy;
use pelorus_domain::ConfidenceWeights;
use pelorus_planner::PlannerConfig;
use pelorus_ranker::RankerConfig;
use pelorus_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};

fn default_topic_keywords() -> Vec<String> {
    [
        "vessel", "ship", "imo", "mmsi", "maritime", "fleet", "tonnage", "registry", "owner",
        "operator", "flag", "class", "dwt", "hull",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// TTL for cached retrieval results (seconds)
    pub cache_ttl_seconds: u64,

    /// Hard bound on reflexion refinement iterations
    pub max_reflexion_iterations: u32,

    /// Minimum content length for a refinement source to count as topical
    pub reflexion_min_content_len: usize,

    /// Keywords a refinement source must mention to count as topical
    #[serde(default = "default_topic_keywords")]
    pub reflexion_topic_keywords: Vec<String>,

    /// Query planner settings (includes the sub-query budget)
    pub planner: PlannerConfig,

    /// Retry/backoff policy for provider calls
    pub retry: RetryPolicy,

    /// Aggregation and ranking settings
    pub ranker: RankerConfig,

    /// Entity validation ladders
    pub validator: ValidatorConfig,

    /// Minimum-citation policy
    pub citation: CitationPolicy,

    /// Confidence scorer adjustments
    #[serde(skip, default)]
    pub confidence: ConfidenceWeights,
}

impl PipelineConfig {
    /// Validate every section, fail-fast
    pub fn validate(&self) -> Result<(), String> {
        if self.cache_ttl_seconds == 0 {
            return Err("cache_ttl_seconds must be greater than 0".to_string());
        }
        self.planner.validate()?;
        self.retry.validate()?;
        self.ranker.validate()?;
        self.validator.validate()?;
        Ok(())
    }

    /// Preset for technical-depth answers (5 citations minimum)
    pub fn technical_depth() -> Self {
        Self {
            citation: CitationPolicy::technical_depth(),
            ..Default::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: 900,
            max_reflexion_iterations: 2,
            reflexion_min_content_len: 80,
            reflexion_topic_keywords: default_topic_keywords(),
            planner: PlannerConfig::default(),
            retry: RetryPolicy::default(),
            ranker: RankerConfig::default(),
            validator: ValidatorConfig::default(),
            citation: CitationPolicy::standard(),
            confidence: ConfidenceWeights::default(),
        }
    }
}
