//! Entity validation logic

use crate::config::ValidatorConfig;
use crate::identifiers::IdentifierRules;
use crate::matcher::{name_confidence, primary_confidence, secondary_confidence, MatchCounts};
use pelorus_domain::tier::{categorize, Tier};
use pelorus_domain::{EntityIdentifiers, IdentifierKind, Source, ValidationResult};
use tracing::debug;

/// The Entity Validator confirms sources describe the target entity
///
/// Applicable only to queries about an individually identifiable entity
/// (a named vessel, a company). Validation never errors: an ambiguous or
/// absent target degrades to a non-match with confidence 0.
pub struct EntityValidator {
    rules: IdentifierRules,
    config: ValidatorConfig,
}

impl EntityValidator {
    /// Create a validator with the given configuration
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            rules: IdentifierRules::new(),
            config,
        }
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidatorConfig::default())
    }

    /// Validate that the sources refer to the entity in the query
    ///
    /// `answer` is the synthesized answer text, if one exists; identifiers
    /// found there corroborate `matched_by` but never change the
    /// source-count-based confidence.
    pub fn validate(
        &self,
        query: &str,
        sources: &[Source],
        answer: Option<&str>,
    ) -> ValidationResult {
        let target = self.rules.extract_all(query);
        if target.is_empty() {
            debug!("no target identifiers extractable from query");
            return ValidationResult::no_match(sources.to_vec());
        }

        let mut primary = MatchCounts::default();
        let mut secondary = MatchCounts::default();
        let mut name = MatchCounts::default();
        let mut matched_by = Vec::new();
        let mut matched_sources = Vec::new();

        for source in sources {
            let text = format!("{} {}", source.title, source.content);
            let found = self.rules.extract_all(&text);
            let authoritative = categorize(&source.url) == Tier::T1;

            let mut source_matched = false;

            if matches_field(&target.imo, &found.imo) {
                primary.record(authoritative);
                push_unique(&mut matched_by, IdentifierKind::Imo);
                source_matched = true;
            }
            if matches_field(&target.mmsi, &found.mmsi) {
                secondary.record(authoritative);
                push_unique(&mut matched_by, IdentifierKind::Mmsi);
                source_matched = true;
            }
            if matches_call_sign(&target.call_sign, &found.call_sign) {
                secondary.record(authoritative);
                push_unique(&mut matched_by, IdentifierKind::CallSign);
                source_matched = true;
            }
            if matches_name(&target.name, &text) {
                name.record(authoritative);
                push_unique(&mut matched_by, IdentifierKind::Name);
                source_matched = true;
            }

            if source_matched {
                matched_sources.push(source.clone());
            }
        }

        // The answer corroborates but never counts as a source
        if let Some(answer) = answer {
            let found = self.rules.extract_all(answer);
            if matches_field(&target.imo, &found.imo) {
                push_unique(&mut matched_by, IdentifierKind::Imo);
            }
        }

        // Strongest signal wins: max across rule families, never a sum
        let confidence = [
            primary_confidence(primary, &self.config),
            secondary_confidence(secondary, &self.config),
            name_confidence(name, &self.config),
        ]
        .into_iter()
        .flatten()
        .fold(0.0_f64, f64::max);

        let is_match = confidence >= self.config.match_threshold;

        // Never strand downstream consumers with zero evidence
        let filtered_sources = if matched_sources.is_empty() {
            sources.to_vec()
        } else {
            matched_sources
        };

        debug!(
            confidence,
            is_match,
            matched = filtered_sources.len(),
            "entity validation complete"
        );

        ValidationResult {
            is_match,
            confidence,
            matched_by,
            filtered_sources,
        }
    }

    /// Target identifiers extracted from a query, for coverage checks
    pub fn target_identifiers(&self, query: &str) -> EntityIdentifiers {
        self.rules.extract_all(query)
    }

    /// Whether the sources disagree on the primary identifier
    ///
    /// True when two or more distinct labeled IMO numbers appear across
    /// the source set, which usually means evidence about different hulls
    /// got mixed together.
    pub fn detect_identifier_conflicts(&self, sources: &[Source]) -> bool {
        let mut seen: Option<String> = None;
        for source in sources {
            let text = format!("{} {}", source.title, source.content);
            if let Some(imo) = self.rules.extract_imo(&text) {
                match &seen {
                    Some(first) if *first != imo => return true,
                    Some(_) => {}
                    None => seen = Some(imo),
                }
            }
        }
        false
    }
}

/// Whether a query concerns an individually identifiable entity
///
/// True when the query carries an identifier label, a vessel-prefixed
/// name, or explicit entity context.
pub fn is_entity_query(query: &str, entity_context: Option<&str>) -> bool {
    if entity_context.is_some_and(|c| !c.trim().is_empty()) {
        return true;
    }
    let rules = IdentifierRules::new();
    let ids = rules.extract_all(query);
    ids.imo.is_some() || ids.mmsi.is_some() || ids.call_sign.is_some() || ids.name.is_some()
}

fn matches_field(target: &Option<String>, found: &Option<String>) -> bool {
    matches!((target, found), (Some(t), Some(f)) if t == f)
}

fn matches_call_sign(target: &Option<String>, found: &Option<String>) -> bool {
    matches!((target, found), (Some(t), Some(f)) if t.eq_ignore_ascii_case(f))
}

fn matches_name(target: &Option<String>, source_text: &str) -> bool {
    match target {
        Some(name) => source_text.to_lowercase().contains(&name.to_lowercase()),
        None => false,
    }
}

fn push_unique(kinds: &mut Vec<IdentifierKind>, kind: IdentifierKind) {
    if !kinds.contains(&kind) {
        kinds.push(kind);
    }
}
