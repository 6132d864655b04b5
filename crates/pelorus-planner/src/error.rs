//! Planner error types

use thiserror::Error;

/// Errors that can occur during query planning
///
/// These never surface past the planner: every variant degrades to the
/// deterministic template fallback.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Model output was not the expected JSON structure
    #[error("Invalid plan format: {0}")]
    InvalidFormat(String),

    /// Model output parsed but contained no usable sub-query
    #[error("Model returned an empty plan")]
    EmptyPlan,

    /// The assisting model call failed
    #[error("LLM call failed: {0}")]
    Llm(String),

    /// The assisting model call exceeded its deadline
    #[error("Planning call timed out")]
    Timeout,
}
