//! Pipeline error types

use thiserror::Error;

/// Errors surfaced by the pipeline
///
/// Per the failure policy, only configuration problems discovered at
/// construction time are fatal; everything else degrades in place.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration, rejected fail-fast before any request runs
    #[error("Invalid configuration: {0}")]
    Config(String),
}
