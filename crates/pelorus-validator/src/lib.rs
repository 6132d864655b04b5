//! Pelorus Entity Validator
//!
//! Confirms that aggregated sources refer to the same real-world entity
//! the user asked about. Identifier extraction is a versioned regex rule
//! table (`IdentifierRules`); matching applies weighted rules where the
//! strongest signal wins and weaker signal families can never outrank
//! stronger ones.
//!
//! Validation never errors: ambiguous or absent identifiers degrade to a
//! non-match with confidence 0.

#![warn(missing_docs)]

pub mod config;
pub mod identifiers;
pub mod matcher;
pub mod validator;

pub use config::ValidatorConfig;
pub use identifiers::IdentifierRules;
pub use validator::{is_entity_query, EntityValidator};
