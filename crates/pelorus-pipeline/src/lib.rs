//! Pelorus Research Pipeline
//!
//! The orchestration layer: wires the planner, parallel retrieval with
//! cache-first semantics and bounded retries, the aggregator/ranker,
//! confidence scoring, entity validation, the reflexion refinement loop,
//! answer synthesis through the LLM seam, and post-hoc citation
//! enforcement into one `run()` entry point.
//!
//! # Failure policy
//!
//! Nothing in the pipeline raises to the caller after construction.
//! Every collaborator failure degrades locally: a dead search branch
//! yields an empty result, a broken cache reads as a miss, malformed
//! model output falls back to template planning, and a request that hits
//! every failure at once still returns a best-effort payload with
//! diagnostics showing the degradation. The only fatal errors are
//! configuration problems caught at construction time.
//!
//! # Concurrency
//!
//! One request runs on one logical task. Retrieval fans out one
//! concurrent operation per sub-query and fans back in before the
//! aggregator runs. Reflexion iterations are strictly sequential; only
//! the retrieval inside one iteration is concurrent. Per-request state is
//! task-local; the cache store is the only shared collaborator. Callers
//! wanting an end-to-end deadline wrap `run()` in their own
//! `tokio::time::timeout` and substitute a fallback response on expiry.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod progress;
pub mod reflexion;
pub mod retrieval;
pub mod retry;
pub mod synthesis;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use metrics::RetrievalMetrics;
pub use pipeline::{NoLlm, ResearchOutcome, ResearchPipeline};
pub use progress::{ChannelSink, CollectingSink, NullSink};
pub use retry::RetryPolicy;
