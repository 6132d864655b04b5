//! Pelorus Domain Layer
//!
//! This crate contains the core business logic and domain model for Pelorus.
//! It stays dependency-light and defines the fundamental concepts, value
//! objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Source**: a retrieved evidence document; identity is its canonical URL
//! - **Tier**: authority classification of a source's domain (T1/T2/T3)
//! - **SubQuery / QueryPlan**: the decomposition of a user query
//! - **Confidence Score**: 0-100 summary of evidentiary strength
//! - **Entity Identifiers**: IMO / MMSI / call sign / name extracted from text
//! - **Cache Entry**: TTL-bearing retrieval result blob
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture:
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod confidence;
pub mod diagnostics;
pub mod identity;
pub mod progress;
pub mod query;
pub mod request;
pub mod source;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use cache::CacheEntry;
pub use confidence::{ConfidenceFlags, ConfidenceLabel, ConfidenceScore, ConfidenceWeights};
pub use diagnostics::{Diagnostics, TierCounts};
pub use identity::{EntityIdentifiers, IdentifierKind, ValidationResult};
pub use progress::ProgressEvent;
pub use query::{EvidenceGap, PlanStrategy, Priority, QueryPlan, SubQuery};
pub use request::RequestId;
pub use source::Source;
pub use tier::Tier;
