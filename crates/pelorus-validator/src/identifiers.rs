//! Identifier extraction rule table
//!
//! Each pattern family lives behind a named extraction function so the
//! families can be unit-tested independently and the whole table swapped
//! as a versioned unit.

use pelorus_domain::EntityIdentifiers;
use regex::Regex;

/// Compiled identifier extraction patterns
///
/// Construct once and reuse; compilation is not free.
pub struct IdentifierRules {
    imo: Regex,
    mmsi: Regex,
    call_sign: Regex,
    quoted_name: Regex,
    prefixed_name: Regex,
    proper_pair: Regex,
}

impl IdentifierRules {
    /// Build the current rule table
    pub fn new() -> Self {
        Self {
            // 7-digit registry number preceded by its label
            imo: Regex::new(r"(?i)\bIMO(?:\s*(?:number|no\.?|#))?\s*[:.]?\s*(\d{7})\b")
                .expect("static imo pattern"),
            // 9-digit maritime station number preceded by its label
            mmsi: Regex::new(r"(?i)\bMMSI(?:\s*(?:number|no\.?|#))?\s*[:.]?\s*(\d{9})\b")
                .expect("static mmsi pattern"),
            // Alphanumeric token preceded by its label
            call_sign: Regex::new(r"(?i)\bcall\s*sign\s*[:.]?\s*([A-Za-z0-9]{3,8})\b")
                .expect("static call sign pattern"),
            quoted_name: Regex::new(r#""([^"]{2,60})""#).expect("static quoted name pattern"),
            // Vessel-prefixed name: MV Ever Given, MT Front Altair, ...
            prefixed_name: Regex::new(
                r"\b(?:MV|MS|MT|SS|MSC)\s+([A-Z][A-Za-z0-9-]*(?:\s+[A-Z][A-Za-z0-9-]*){0,3})",
            )
            .expect("static prefixed name pattern"),
            // Best-effort proper-noun pair
            proper_pair: Regex::new(r"\b([A-Z][a-z]+\s+[A-Z][a-z]+)\b")
                .expect("static proper pair pattern"),
        }
    }

    /// Extract a labeled 7-digit IMO number
    pub fn extract_imo(&self, text: &str) -> Option<String> {
        self.imo
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Extract a labeled 9-digit MMSI
    pub fn extract_mmsi(&self, text: &str) -> Option<String> {
        self.mmsi
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Extract a labeled call sign, uppercased
    pub fn extract_call_sign(&self, text: &str) -> Option<String> {
        self.call_sign
            .captures(text)
            .map(|caps| caps[1].to_uppercase())
    }

    /// Extract a best-effort entity name
    ///
    /// Tries, in order: a quoted name, a vessel-prefixed name, then a
    /// bare proper-noun pair.
    pub fn extract_name(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.quoted_name.captures(text) {
            return Some(caps[1].trim().to_string());
        }
        if let Some(caps) = self.prefixed_name.captures(text) {
            return Some(caps[1].trim().to_string());
        }
        self.proper_pair
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
    }

    /// Extract every identifier family from free text
    pub fn extract_all(&self, text: &str) -> EntityIdentifiers {
        EntityIdentifiers {
            name: self.extract_name(text),
            imo: self.extract_imo(text),
            mmsi: self.extract_mmsi(text),
            call_sign: self.extract_call_sign(text),
        }
    }
}

impl Default for IdentifierRules {
    fn default() -> Self {
        Self::new()
    }
}
