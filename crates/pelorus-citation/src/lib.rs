//! Pelorus Citation Enforcer
//!
//! Post-processes generated answer text to guarantee a minimum citation
//! density. Factual statements are detected through a fixed, ordered
//! rule table (`FactRules`); citations referencing ranked source indices
//! are injected after the strongest uncited spans.
//!
//! Guarantees: existing citations are never removed or renumbered, every
//! injected index lies within `[1, source_count]`, and when no safe
//! insertion point exists the original text comes back unchanged.

#![warn(missing_docs)]

pub mod enforcer;
pub mod patterns;
pub mod policy;

pub use enforcer::{CitationEnforcementResult, CitationEnforcer};
pub use patterns::{FactKind, FactRules, FactSpan};
pub use policy::CitationPolicy;
