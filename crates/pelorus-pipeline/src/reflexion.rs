//! Reflexion controller state machine
//!
//! The bounded iterative gap-detection-and-refill loop is modeled as an
//! explicit finite state machine with a pure transition function, so the
//! convergence and abort guarantees are testable without any I/O. The
//! async driver that executes `Refine` decisions lives in the pipeline.

use pelorus_domain::{EvidenceGap, IdentifierKind, Source, Tier, ValidationResult};

/// Phase of the reflexion state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflexionPhase {
    /// Assessing evidence gaps
    Evaluating,

    /// Executing a refinement round
    Refining,

    /// Terminal: every coverage check is satisfied
    Converged,

    /// Terminal: refinement stopped without full coverage
    Aborted,
}

/// Why the controller aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Gap count failed to improve between iterations
    Stagnation,

    /// The fixed iteration bound was reached
    IterationCap,

    /// A refinement round produced no new unique source
    NoNewSources,
}

/// Mutable per-request reflexion state
///
/// `iteration` strictly increases and is bounded by the configured
/// maximum; `last_gap_count` starts as the +infinity sentinel (`None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflexionState {
    /// Completed refinement iterations
    pub iteration: u32,

    /// Gap count observed at the previous evaluation (`None` = sentinel)
    pub last_gap_count: Option<usize>,
}

impl ReflexionState {
    /// Initial state
    pub fn new() -> Self {
        Self {
            iteration: 0,
            last_gap_count: None,
        }
    }

    /// Record the start of a refinement round
    pub fn begin_refinement(&mut self, gap_count: usize) {
        self.iteration += 1;
        self.last_gap_count = Some(gap_count);
    }
}

impl Default for ReflexionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Decision produced by one evaluation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// All checks met; stop successfully
    Converge,

    /// Stop without full coverage
    Abort(AbortReason),

    /// Run another refinement round
    Refine,
}

impl Decision {
    /// The phase the machine enters when this decision is taken
    pub fn phase(&self) -> ReflexionPhase {
        match self {
            Decision::Converge => ReflexionPhase::Converged,
            Decision::Abort(_) => ReflexionPhase::Aborted,
            Decision::Refine => ReflexionPhase::Refining,
        }
    }
}

/// Pure transition function for the `Evaluating` step
///
/// Rules, evaluated in order:
/// 1. zero gaps -> `Converge`
/// 2. no improvement over the previous iteration -> `Abort(Stagnation)`
/// 3. iteration bound reached -> `Abort(IterationCap)`
/// 4. otherwise -> `Refine`
pub fn transition(state: &ReflexionState, gap_count: usize, max_iterations: u32) -> Decision {
    if gap_count == 0 {
        return Decision::Converge;
    }
    if state.iteration > 0 {
        if let Some(last) = state.last_gap_count {
            if gap_count >= last {
                return Decision::Abort(AbortReason::Stagnation);
            }
        }
    }
    if state.iteration >= max_iterations {
        return Decision::Abort(AbortReason::IterationCap);
    }
    Decision::Refine
}

/// Run the domain coverage checks against the current evidence
///
/// Returns the unmet checks: registry-class source present, identifier
/// match confirmed, owner/operator mention present.
pub fn coverage_gaps(sources: &[Source], validation: &ValidationResult) -> Vec<EvidenceGap> {
    let mut gaps = Vec::new();

    if !sources.iter().any(|s| s.tier == Tier::T1) {
        gaps.push(EvidenceGap::RegistrySource);
    }

    let has_identifier_match = validation.matched_by.iter().any(|kind| {
        matches!(
            kind,
            IdentifierKind::Imo | IdentifierKind::Mmsi | IdentifierKind::CallSign
        )
    });
    if !has_identifier_match {
        gaps.push(EvidenceGap::IdentifierMatch);
    }

    let has_owner_mention = sources.iter().any(|s| {
        let text = s.content.to_lowercase();
        text.contains("owner") || text.contains("operator") || text.contains("managed by")
    });
    if !has_owner_mention {
        gaps.push(EvidenceGap::OwnerOperator);
    }

    gaps
}

/// Whether a refinement source is on-topic enough to merge
///
/// Off-topic and near-empty snippets are discarded before re-aggregation
/// so a refinement round can't dilute the ranked set.
pub fn is_topically_relevant(source: &Source, keywords: &[String], min_content_len: usize) -> bool {
    if source.content.len() < min_content_len {
        return false;
    }
    let text = format!("{} {}", source.title, source.content).to_lowercase();
    keywords.iter().any(|kw| text.contains(kw.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t1_source(content: &str) -> Source {
        let mut s = Source::new("registry", "https://equasis.org/ship/1", content);
        s.tier = Tier::T1;
        s
    }

    fn t3_source(content: &str) -> Source {
        Source::new("blog", "https://blog.example.com/x", content)
    }

    fn validation(matched_by: Vec<IdentifierKind>) -> ValidationResult {
        ValidationResult {
            is_match: !matched_by.is_empty(),
            confidence: 0.9,
            matched_by,
            filtered_sources: Vec::new(),
        }
    }

    #[test]
    fn test_zero_gaps_converges() {
        let state = ReflexionState::new();
        assert_eq!(transition(&state, 0, 2), Decision::Converge);
    }

    #[test]
    fn test_first_evaluation_refines() {
        let state = ReflexionState::new();
        assert_eq!(transition(&state, 3, 2), Decision::Refine);
    }

    #[test]
    fn test_stagnation_aborts() {
        let mut state = ReflexionState::new();
        state.begin_refinement(2);
        // second evaluation sees the same gap count
        assert_eq!(
            transition(&state, 2, 2),
            Decision::Abort(AbortReason::Stagnation)
        );
    }

    #[test]
    fn test_regression_aborts() {
        let mut state = ReflexionState::new();
        state.begin_refinement(1);
        assert_eq!(
            transition(&state, 2, 2),
            Decision::Abort(AbortReason::Stagnation)
        );
    }

    #[test]
    fn test_iteration_cap_aborts() {
        let mut state = ReflexionState::new();
        state.begin_refinement(3);
        state.begin_refinement(2);
        // improved (2 -> 1) but the bound is reached
        assert_eq!(
            transition(&state, 1, 2),
            Decision::Abort(AbortReason::IterationCap)
        );
    }

    #[test]
    fn test_improvement_refines_again() {
        let mut state = ReflexionState::new();
        state.begin_refinement(3);
        assert_eq!(transition(&state, 1, 2), Decision::Refine);
    }

    #[test]
    fn test_convergence_beats_every_other_rule() {
        let mut state = ReflexionState::new();
        state.begin_refinement(2);
        state.begin_refinement(1);
        // at the cap AND not improving, but gaps hit zero
        assert_eq!(transition(&state, 0, 2), Decision::Converge);
    }

    #[test]
    fn test_decision_phase_mapping() {
        assert_eq!(Decision::Converge.phase(), ReflexionPhase::Converged);
        assert_eq!(
            Decision::Abort(AbortReason::Stagnation).phase(),
            ReflexionPhase::Aborted
        );
        assert_eq!(Decision::Refine.phase(), ReflexionPhase::Refining);
        // Evaluating is the resting phase between decisions
        assert_ne!(ReflexionPhase::Evaluating, ReflexionPhase::Refining);
    }

    #[test]
    fn test_iteration_strictly_increases() {
        let mut state = ReflexionState::new();
        state.begin_refinement(3);
        state.begin_refinement(2);
        assert_eq!(state.iteration, 2);
        assert_eq!(state.last_gap_count, Some(2));
    }

    #[test]
    fn test_coverage_all_gaps() {
        let sources = vec![t3_source("nothing useful")];
        let gaps = coverage_gaps(&sources, &validation(vec![]));
        assert_eq!(gaps.len(), 3);
    }

    #[test]
    fn test_coverage_no_gaps() {
        let sources = vec![t1_source("registered owner: Example Shipping Ltd")];
        let gaps = coverage_gaps(&sources, &validation(vec![IdentifierKind::Imo]));
        assert!(gaps.is_empty());
    }

    #[test]
    fn test_name_match_does_not_satisfy_identifier_check() {
        let sources = vec![t1_source("registered owner: Example Shipping Ltd")];
        let gaps = coverage_gaps(&sources, &validation(vec![IdentifierKind::Name]));
        assert_eq!(gaps, vec![EvidenceGap::IdentifierMatch]);
    }

    #[test]
    fn test_topical_relevance_filter() {
        let keywords = vec!["vessel".to_string(), "imo".to_string()];

        let relevant = t3_source(
            "The vessel was inspected at the terminal and cleared for departure shortly after.",
        );
        assert!(is_topically_relevant(&relevant, &keywords, 40));

        let too_short = t3_source("vessel");
        assert!(!is_topically_relevant(&too_short, &keywords, 40));

        let off_topic = t3_source(
            "A lengthy article about gardening techniques and the best soil for tomatoes in spring.",
        );
        assert!(!is_topically_relevant(&off_topic, &keywords, 40));
    }
}
