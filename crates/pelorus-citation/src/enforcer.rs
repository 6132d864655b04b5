//! Citation enforcement logic

use crate::patterns::FactRules;
use crate::policy::CitationPolicy;
use pelorus_domain::Source;
use tracing::debug;

/// Result of one enforcement pass
#[derive(Debug, Clone, PartialEq)]
pub struct CitationEnforcementResult {
    /// The answer text, possibly with injected citations
    pub enforced_text: String,

    /// Citations injected by this pass
    pub citations_added: usize,

    /// Citation markers already present before the pass
    pub citations_found: usize,

    /// Citations required by policy (`min(configured, source_count)`)
    pub citations_required: usize,

    /// Whether this pass changed the text
    pub was_enforced: bool,
}

impl CitationEnforcementResult {
    fn unchanged(text: &str, found: usize, required: usize) -> Self {
        Self {
            enforced_text: text.to_string(),
            citations_added: 0,
            citations_found: found,
            citations_required: required,
            was_enforced: false,
        }
    }
}

/// The Citation Enforcer guarantees minimum citation density post hoc
pub struct CitationEnforcer {
    rules: FactRules,
    policy: CitationPolicy,
}

impl CitationEnforcer {
    /// Create an enforcer with the given policy
    pub fn new(policy: CitationPolicy) -> Self {
        Self {
            rules: FactRules::new(),
            policy,
        }
    }

    /// Create an enforcer with the standard policy
    pub fn standard() -> Self {
        Self::new(CitationPolicy::standard())
    }

    /// Enforce the minimum citation policy on answer text
    ///
    /// Existing citations are never removed or renumbered. Injected
    /// citation indices cycle round-robin through `[1, source_count]`.
    pub fn enforce(&self, text: &str, sources: &[Source]) -> CitationEnforcementResult {
        let citations_found = self.rules.count_citations(text);
        let citations_required = self.policy.required(sources.len());

        if citations_found >= citations_required || sources.is_empty() {
            return CitationEnforcementResult::unchanged(text, citations_found, citations_required);
        }

        let needed = citations_required - citations_found;

        // Candidate spans, strongest first, capped, then uncited only
        let mut candidates = self.rules.find_spans(text);
        candidates.truncate(self.policy.max_candidate_spans);
        candidates.retain(|span| !self.rules.cited_at(text, span.end));

        if candidates.is_empty() {
            debug!("no factual spans found, trying paragraph fallback");
            return self.enforce_by_paragraph(text, sources.len(), citations_found, citations_required);
        }

        // Assign round-robin indices in priority order, then inject at
        // descending text position so earlier offsets stay valid
        let mut selected: Vec<(usize, usize)> = candidates
            .iter()
            .take(needed)
            .enumerate()
            .map(|(i, span)| (span.end, i % sources.len() + 1))
            .collect();
        selected.sort_by(|a, b| b.0.cmp(&a.0));

        let mut enforced = text.to_string();
        for (offset, index) in &selected {
            enforced.insert_str(*offset, &format!("[{}]", index));
        }

        let citations_added = selected.len();
        debug!(citations_added, citations_found, citations_required, "citations injected");

        CitationEnforcementResult {
            enforced_text: enforced,
            citations_added,
            citations_found,
            citations_required,
            was_enforced: citations_added > 0,
        }
    }

    /// Fallback: append one citation at the end of each leading paragraph
    fn enforce_by_paragraph(
        &self,
        text: &str,
        source_count: usize,
        citations_found: usize,
        citations_required: usize,
    ) -> CitationEnforcementResult {
        let needed = citations_required - citations_found;

        let paragraphs: Vec<&str> = text
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .collect();
        if paragraphs.is_empty() {
            // No safe insertion point anywhere; hand the text back untouched
            return CitationEnforcementResult::unchanged(text, citations_found, citations_required);
        }

        let mut remaining = needed;
        let mut citation_index = 0usize;
        let mut rebuilt: Vec<String> = Vec::new();

        for paragraph in text.split("\n\n") {
            if remaining > 0 && !paragraph.trim().is_empty() {
                let index = citation_index % source_count + 1;
                citation_index += 1;
                remaining -= 1;
                rebuilt.push(format!("{}[{}]", paragraph.trim_end(), index));
            } else {
                rebuilt.push(paragraph.to_string());
            }
        }

        let citations_added = needed - remaining;

        CitationEnforcementResult {
            enforced_text: rebuilt.join("\n\n"),
            citations_added,
            citations_found,
            citations_required,
            was_enforced: citations_added > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(n: usize) -> Vec<Source> {
        (0..n)
            .map(|i| {
                Source::new(
                    format!("source {}", i),
                    format!("https://site{}.example.com", i),
                    "content",
                )
            })
            .collect()
    }

    #[test]
    fn test_already_sufficient_is_untouched() {
        let enforcer = CitationEnforcer::standard();
        let text = "Fact one [1]. Fact two [2]. Fact three [3].";
        let result = enforcer.enforce(text, &sources(4));

        assert!(!result.was_enforced);
        assert_eq!(result.enforced_text, text);
        assert_eq!(result.citations_found, 3);
        assert_eq!(result.citations_added, 0);
    }

    #[test]
    fn test_injection_counts_and_bounds() {
        let enforcer = CitationEnforcer::standard();
        // 1 existing citation, 4 sources, minimum 3 -> exactly 2 injected
        let text = "The ship is 399.9 m long [1]. She was launched in 2018. \
                    The vessel is operated by Evergreen Marine. IMO 9811000.";
        let result = enforcer.enforce(text, &sources(4));

        assert!(result.was_enforced);
        assert_eq!(result.citations_found, 1);
        assert_eq!(result.citations_required, 3);
        assert_eq!(result.citations_added, 2);

        // original citation untouched
        assert!(result.enforced_text.contains("[1]."));

        // every marker references an index in [1, 4]
        let rules = FactRules::new();
        assert_eq!(rules.count_citations(&result.enforced_text), 3);
        for caps in regex::Regex::new(r"\[(\d+)\]")
            .unwrap()
            .captures_iter(&result.enforced_text)
        {
            let index: usize = caps[1].parse().unwrap();
            assert!((1..=4).contains(&index));
        }
    }

    #[test]
    fn test_required_capped_by_source_count() {
        let enforcer = CitationEnforcer::standard();
        let text = "Length 399 m. Launched in 2018.";
        let result = enforcer.enforce(text, &sources(1));

        assert_eq!(result.citations_required, 1);
        assert_eq!(result.citations_added, 1);
        assert!(result.enforced_text.contains("[1]"));
    }

    #[test]
    fn test_round_robin_indices() {
        let enforcer = CitationEnforcer::new(CitationPolicy::with_minimum(4));
        let text = "Length 399 m. Beam 59 m. Draft 14 m. Speed 22 knots.";
        let result = enforcer.enforce(text, &sources(2));

        // indices cycle 1, 2, 1, 2 over the two sources
        assert_eq!(result.citations_added, 2);
        // only 2 required: min(4, 2)
        assert_eq!(result.citations_required, 2);
    }

    #[test]
    fn test_no_sources_never_injects() {
        let enforcer = CitationEnforcer::standard();
        let text = "Length 399 m.";
        let result = enforcer.enforce(text, &sources(0));

        assert!(!result.was_enforced);
        assert_eq!(result.enforced_text, text);
        assert_eq!(result.citations_required, 0);
    }

    #[test]
    fn test_paragraph_fallback() {
        let enforcer = CitationEnforcer::standard();
        // prose with zero factual spans
        let text = "A gentle introduction.\n\nSome more narrative text.\n\nA closing remark.";
        let result = enforcer.enforce(text, &sources(3));

        assert!(result.was_enforced);
        assert_eq!(result.citations_added, 3);
        let lines: Vec<&str> = result.enforced_text.split("\n\n").collect();
        assert!(lines[0].ends_with("[1]"));
        assert!(lines[1].ends_with("[2]"));
        assert!(lines[2].ends_with("[3]"));
    }

    #[test]
    fn test_empty_text_returned_unchanged() {
        let enforcer = CitationEnforcer::standard();
        let result = enforcer.enforce("", &sources(3));

        assert!(!result.was_enforced);
        assert_eq!(result.enforced_text, "");
    }

    #[test]
    fn test_never_reduces_found_citations() {
        let enforcer = CitationEnforcer::standard();
        let text = "Cited fact [2](https://example.org). Length 399 m. Launched in 2018.";
        let result = enforcer.enforce(text, &sources(4));

        assert!(result
            .enforced_text
            .contains("[2](https://example.org)"));
        let rules = FactRules::new();
        assert!(rules.count_citations(&result.enforced_text) >= result.citations_found);
    }

    #[test]
    fn test_already_cited_span_is_skipped() {
        let enforcer = CitationEnforcer::standard();
        let text = "Length 399 m [3]. Launched in 2018. Operated by Evergreen.";
        let result = enforcer.enforce(text, &sources(4));

        // the measurement already carries a citation; the two injections go
        // to the other spans
        assert_eq!(result.citations_added, 2);
        assert!(!result.enforced_text.contains("m [3].[")); // no double-citation
    }
}
