//! Minimum-citation policy

use serde::{Deserialize, Serialize};

/// Default minimum citations for standard answers
pub const STANDARD_MINIMUM: usize = 3;

/// Default minimum citations for technical-depth answers
pub const TECHNICAL_DEPTH_MINIMUM: usize = 5;

/// Policy controlling how many citations an answer must carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CitationPolicy {
    /// Configured minimum citation count
    pub configured_minimum: usize,

    /// Cap on factual-span candidates considered for injection
    pub max_candidate_spans: usize,
}

impl CitationPolicy {
    /// Standard policy (minimum 3)
    pub fn standard() -> Self {
        Self {
            configured_minimum: STANDARD_MINIMUM,
            max_candidate_spans: 20,
        }
    }

    /// Technical-depth policy (minimum 5)
    pub fn technical_depth() -> Self {
        Self {
            configured_minimum: TECHNICAL_DEPTH_MINIMUM,
            max_candidate_spans: 20,
        }
    }

    /// Policy with an explicit minimum
    pub fn with_minimum(configured_minimum: usize) -> Self {
        Self {
            configured_minimum,
            max_candidate_spans: 20,
        }
    }

    /// Citations actually required for a given ranked source count
    ///
    /// Never more than there are sources to cite.
    pub fn required(&self, source_count: usize) -> usize {
        self.configured_minimum.min(source_count)
    }
}

impl Default for CitationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
