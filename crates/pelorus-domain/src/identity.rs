//! Entity identity value objects

use crate::source::Source;

/// Kind of identifier an entity match was established by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// IMO number (7 digits) - the primary vessel identifier
    Imo,

    /// MMSI (9 digits) - maritime station number
    Mmsi,

    /// Radio call sign
    CallSign,

    /// Vessel or company name
    Name,
}

impl IdentifierKind {
    /// Get the identifier-kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Imo => "imo",
            IdentifierKind::Mmsi => "mmsi",
            IdentifierKind::CallSign => "call_sign",
            IdentifierKind::Name => "name",
        }
    }
}

/// Identifiers extracted from free text
///
/// Used both for the user's target entity and for each candidate source.
/// All fields are optional; extraction is best-effort.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityIdentifiers {
    /// Extracted entity name, if any
    pub name: Option<String>,

    /// IMO number (7 digits)
    pub imo: Option<String>,

    /// MMSI (9 digits)
    pub mmsi: Option<String>,

    /// Radio call sign
    pub call_sign: Option<String>,
}

impl EntityIdentifiers {
    /// Whether no identifier of any kind was extracted
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.imo.is_none()
            && self.mmsi.is_none()
            && self.call_sign.is_none()
    }
}

/// Result of validating that sources refer to the target entity
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether the evidence matches the target entity
    pub is_match: bool,

    /// Match confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Identifier kinds that produced a match
    pub matched_by: Vec<IdentifierKind>,

    /// Sources whose identifiers matched the target
    ///
    /// When nothing matched, this is the original unfiltered set so that
    /// downstream consumers are never left with zero evidence.
    pub filtered_sources: Vec<Source>,
}

impl ValidationResult {
    /// A non-match result carrying the original sources unchanged
    pub fn no_match(sources: Vec<Source>) -> Self {
        Self {
            is_match: false,
            confidence: 0.0,
            matched_by: Vec::new(),
            filtered_sources: sources,
        }
    }
}
