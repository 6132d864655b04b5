//! Factual-statement detection rule table
//!
//! A fixed, ordered set of category patterns. Earlier categories are
//! stronger citation anchors; the enforcer consumes candidates in rule
//! order, then document order. The table is versioned as a unit: change
//! it here, not inline at call sites.

use regex::Regex;

/// Category of factual statement a span belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactKind {
    /// Numeric value with a unit ("399.9 m", "20,124 TEU")
    Measurement,

    /// Identifier mention ("IMO 9811000", "call sign H3RC")
    Identifier,

    /// Classification/type phrase ("classed by DNV", "registered in Panama")
    Classification,

    /// Attribution phrase ("operated by Evergreen")
    Attribution,

    /// Dated event ("launched in 2018")
    DatedEvent,
}

/// A factual-statement span within answer text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactSpan {
    /// Byte offset of the span start
    pub start: usize,

    /// Byte offset one past the span end
    pub end: usize,

    /// Rule category that produced the span
    pub kind: FactKind,

    /// Index of the producing rule in the table (priority order)
    pub rule_index: usize,
}

impl FactSpan {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &FactSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Compiled factual-statement patterns, in priority order
pub struct FactRules {
    rules: Vec<(FactKind, Regex)>,
    citation_marker: Regex,
}

impl FactRules {
    /// Build the current rule table
    pub fn new() -> Self {
        let rules = vec![
            (
                FactKind::Measurement,
                Regex::new(
                    r"(?i)\b\d[\d,.]*\s?(?:m|meters|metres|ft|feet|tonnes|tons|dwt|gt|teu|knots|kn|kw|mw|hp|passengers|crew|containers)\b",
                )
                .expect("static measurement pattern"),
            ),
            (
                FactKind::Identifier,
                Regex::new(
                    r"(?:\b(?i:IMO|MMSI)(?:\s*(?i:number|no\.?|#))?\s*[:.]?\s*\d{7,9}\b|\b(?i:call\s*sign)\s*[:.]?\s*[A-Za-z0-9]{3,8}\b)",
                )
                .expect("static identifier pattern"),
            ),
            (
                FactKind::Classification,
                // the named party is a short run of capitalized words so the
                // match cannot bleed across sentence boundaries
                Regex::new(
                    r"\b(?i:classed|classified|registered|flagged)\s+(?i:by|as|in|at|under)\s+[A-Z][\w&'-]*(?:\s+[A-Z][\w&'-]*){0,3}",
                )
                .expect("static classification pattern"),
            ),
            (
                FactKind::Attribution,
                Regex::new(
                    r"\b(?i:operated|owned|managed|chartered|ordered|built)\s+by\s+[A-Z][\w&'-]*(?:\s+[A-Z][\w&'-]*){0,3}",
                )
                .expect("static attribution pattern"),
            ),
            (
                FactKind::DatedEvent,
                Regex::new(
                    r"\b(?i:built|launched|delivered|completed|refitted|scrapped)\s+(?:in\s+)?(?:19|20)\d{2}\b|\b(?i:in|since|during)\s+(?:19|20)\d{2}\b",
                )
                .expect("static dated event pattern"),
            ),
        ];

        Self {
            rules,
            // bracketed index with an optional markdown-style link suffix
            citation_marker: Regex::new(r"\[(\d+)\](?:\([^)]*\))?")
                .expect("static citation marker pattern"),
        }
    }

    /// Count existing citation markers in text
    pub fn count_citations(&self, text: &str) -> usize {
        self.citation_marker.find_iter(text).count()
    }

    /// Whether a citation marker sits immediately after the given offset
    pub fn cited_at(&self, text: &str, offset: usize) -> bool {
        let rest = &text[offset.min(text.len())..];
        let rest = rest.trim_start_matches([' ', '\t']);
        self.citation_marker
            .find(rest)
            .is_some_and(|m| m.start() == 0)
    }

    /// Find factual-statement spans, deduplicated and priority-ordered
    ///
    /// Overlapping spans keep the longer one (rule priority breaks exact
    /// ties). The result is ordered by rule priority, then text position.
    pub fn find_spans(&self, text: &str) -> Vec<FactSpan> {
        let mut raw: Vec<FactSpan> = Vec::new();
        for (rule_index, (kind, pattern)) in self.rules.iter().enumerate() {
            for m in pattern.find_iter(text) {
                raw.push(FactSpan {
                    start: m.start(),
                    end: m.end(),
                    kind: *kind,
                    rule_index,
                });
            }
        }

        // Greedy dedup: longer spans first, earlier rules break ties
        raw.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then(a.rule_index.cmp(&b.rule_index))
                .then(a.start.cmp(&b.start))
        });

        let mut accepted: Vec<FactSpan> = Vec::new();
        for span in raw {
            if !accepted.iter().any(|kept| kept.overlaps(&span)) {
                accepted.push(span);
            }
        }

        accepted.sort_by(|a, b| a.rule_index.cmp(&b.rule_index).then(a.start.cmp(&b.start)));
        accepted
    }
}

impl Default for FactRules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_spans() {
        let rules = FactRules::new();
        let spans = rules.find_spans("The ship is 399.9 m long and carries 20,124 TEU.");
        let measurements: Vec<_> = spans
            .iter()
            .filter(|s| s.kind == FactKind::Measurement)
            .collect();
        assert_eq!(measurements.len(), 2);
    }

    #[test]
    fn test_identifier_spans() {
        let rules = FactRules::new();
        let spans = rules.find_spans("Registered under IMO 9811000 with call sign H3RC.");
        assert!(spans.iter().any(|s| s.kind == FactKind::Identifier));
    }

    #[test]
    fn test_attribution_spans() {
        let rules = FactRules::new();
        let spans = rules.find_spans("The vessel is operated by Evergreen Marine.");
        assert!(spans.iter().any(|s| s.kind == FactKind::Attribution));
    }

    #[test]
    fn test_classification_spans() {
        let rules = FactRules::new();
        let spans = rules.find_spans("She is flagged in Panama and classed by American Bureau.");
        let classifications = spans
            .iter()
            .filter(|s| s.kind == FactKind::Classification)
            .count();
        assert_eq!(classifications, 2);
    }

    #[test]
    fn test_dated_event_spans() {
        let rules = FactRules::new();
        let spans = rules.find_spans("Launched in 2018, she entered service during 2019.");
        let dated = spans.iter().filter(|s| s.kind == FactKind::DatedEvent).count();
        assert_eq!(dated, 2);
    }

    #[test]
    fn test_overlap_dedup_keeps_longer() {
        let rules = FactRules::new();
        // "built in 2018" (dated event) overlaps "built by ..." style matches;
        // craft a direct overlap: "IMO 9811000" also contains a bare number but
        // only the identifier rule should survive intact.
        let spans = rules.find_spans("IMO 9811000");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, FactKind::Identifier);
    }

    #[test]
    fn test_priority_then_position_ordering() {
        let rules = FactRules::new();
        let spans = rules.find_spans("Operated by Evergreen. Length 399 m. IMO 9811000.");
        // Measurement (rule 0) sorts before Identifier (rule 1), which sorts
        // before Attribution (rule 3), regardless of text position
        let kinds: Vec<FactKind> = spans.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![FactKind::Measurement, FactKind::Identifier, FactKind::Attribution]
        );
    }

    #[test]
    fn test_count_citations() {
        let rules = FactRules::new();
        assert_eq!(rules.count_citations("Fact [1] and fact [2](https://x)."), 2);
        assert_eq!(rules.count_citations("No citations."), 0);
        // array-ish brackets without digits don't count
        assert_eq!(rules.count_citations("list [a] thing"), 0);
    }

    #[test]
    fn test_cited_at() {
        let rules = FactRules::new();
        let text = "Length 399 m [1] exactly.";
        let offset = text.find(" [1]").unwrap();
        assert!(rules.cited_at(text, offset));
        assert!(!rules.cited_at(text, 0));
    }

    #[test]
    fn test_no_spans_in_plain_prose() {
        let rules = FactRules::new();
        assert!(rules.find_spans("Just a gentle sentence with no facts.").is_empty());
    }
}
