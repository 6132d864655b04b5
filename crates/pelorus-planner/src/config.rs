//! Configuration for the Query Planner

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Query Planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum sub-queries after budgeting
    pub max_sub_queries: usize,

    /// Maximum time for the assisting model call (seconds)
    pub planning_timeout_secs: u64,
}

impl PlannerConfig {
    /// Get the planning timeout as a Duration
    pub fn planning_timeout(&self) -> Duration {
        Duration::from_secs(self.planning_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_sub_queries == 0 {
            return Err("max_sub_queries must be greater than 0".to_string());
        }
        if self.planning_timeout_secs == 0 {
            return Err("planning_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Narrow preset: fewer sub-queries, shorter planning deadline
    pub fn focused() -> Self {
        Self {
            max_sub_queries: 5,
            planning_timeout_secs: 10,
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

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_sub_queries: 10,
            planning_timeout_secs: 20,
        }
    }
}
