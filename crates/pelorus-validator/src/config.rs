//! Configuration for the Entity Validator

use serde::{Deserialize, Serialize};

/// Confidence ceilings for the weighted matching rules
///
/// The ladders are ordered so a weaker signal family can never outrank a
/// stronger one (primary > secondary > name). These are empirically
/// chosen constants; override through configuration, don't re-derive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Minimum confidence for `is_match`
    pub match_threshold: f64,

    /// Primary identifier in >= 3 sources with >= 2 authoritative hits
    pub primary_strong: f64,

    /// Primary identifier in >= 2 sources (incl. 1 authoritative + 1 other)
    pub primary_moderate: f64,

    /// Primary identifier in exactly 1 authoritative source
    pub primary_single_authoritative: f64,

    /// Primary identifier in exactly 1 non-authoritative source
    pub primary_single: f64,

    /// Secondary identifier in >= 3 sources with >= 2 authoritative hits
    pub secondary_strong: f64,

    /// Secondary identifier in >= 2 sources
    pub secondary_moderate: f64,

    /// Secondary identifier in exactly 1 source
    pub secondary_single: f64,

    /// Name match in >= 2 sources
    pub name_moderate: f64,

    /// Name match in exactly 1 source
    pub name_single: f64,
}

impl ValidatorConfig {
    /// Validate the configuration ladders
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.match_threshold,
            self.primary_strong,
            self.primary_moderate,
            self.primary_single_authoritative,
            self.primary_single,
            self.secondary_strong,
            self.secondary_moderate,
            self.secondary_single,
            self.name_moderate,
            self.name_single,
        ];
        if all.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err("all validator confidences must be within [0, 1]".to_string());
        }
        if self.secondary_strong >= self.primary_strong
            || self.name_moderate >= self.secondary_moderate
        {
            return Err("weaker signal families must stay below stronger ones".to_string());
        }
        Ok(())
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.70,
            primary_strong: 0.95,
            primary_moderate: 0.85,
            primary_single_authoritative: 0.70,
            primary_single: 0.60,
            secondary_strong: 0.80,
            secondary_moderate: 0.65,
            secondary_single: 0.55,
            name_moderate: 0.65,
            name_single: 0.55,
        }
    }
}
