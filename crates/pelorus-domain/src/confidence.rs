//! Confidence scoring - deriving a 0-100 evidentiary-strength score
//!
//! The scorer is pure and deterministic: identical inputs always produce the
//! same score, label, and reasoning trail. All adjustment constants are
//! named configuration, not inferred.

use crate::source::Source;
use crate::tier::Tier;

/// Qualitative label for a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLabel {
    /// Score >= 85: strong, verified evidence
    HighVerified,

    /// Score >= 70: strong evidence, not fully verified
    HighLikely,

    /// Score >= 50: moderate evidence
    MediumLikely,

    /// Score >= 30: weak evidence
    LowUncertain,

    /// Score < 30: effectively unverified
    Unverified,
}

impl ConfidenceLabel {
    /// Get the label name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::HighVerified => "high/verified",
            ConfidenceLabel::HighLikely => "high/likely",
            ConfidenceLabel::MediumLikely => "medium/likely",
            ConfidenceLabel::LowUncertain => "low/uncertain",
            ConfidenceLabel::Unverified => "unverified",
        }
    }
}

/// External flags affecting the score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfidenceFlags {
    /// Conflicting information was detected across sources
    pub conflicting: bool,

    /// Entity verification completed successfully
    pub verification_passed: bool,
}

/// Named adjustment constants for the confidence scorer
///
/// These are empirically chosen values; override them through configuration
/// rather than editing the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceWeights {
    /// Starting score before adjustments
    pub base_score: i32,

    /// Bonus for >= 5 sources
    pub many_sources_bonus: i32,

    /// Penalty for 1-2 sources
    pub few_sources_penalty: i32,

    /// Penalty for zero sources
    pub no_sources_penalty: i32,

    /// Bonus when authoritative (T1) sources form the majority
    pub authoritative_mix_bonus: i32,

    /// Bonus for a standard tier mix
    pub standard_mix_bonus: i32,

    /// Penalty when low-quality (T3) sources dominate
    pub low_quality_mix_penalty: i32,

    /// Penalty when conflicting information was detected
    pub conflict_penalty: i32,

    /// Bonus when no conflicts were detected
    pub no_conflict_bonus: i32,

    /// Bonus when entity verification passed
    pub verification_bonus: i32,

    /// Penalty when verification is incomplete
    pub unverified_penalty: i32,

    /// Label threshold: high/verified
    pub high_verified_threshold: u8,

    /// Label threshold: high/likely
    pub high_likely_threshold: u8,

    /// Label threshold: medium/likely
    pub medium_threshold: u8,

    /// Label threshold: low/uncertain
    pub low_threshold: u8,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            base_score: 50,
            many_sources_bonus: 5,
            few_sources_penalty: -10,
            no_sources_penalty: -20,
            authoritative_mix_bonus: 10,
            standard_mix_bonus: 5,
            low_quality_mix_penalty: -15,
            conflict_penalty: -25,
            no_conflict_bonus: 5,
            verification_bonus: 5,
            unverified_penalty: -10,
            high_verified_threshold: 85,
            high_likely_threshold: 70,
            medium_threshold: 50,
            low_threshold: 30,
        }
    }
}

/// A computed confidence score
///
/// Recomputed, never mutated in place, whenever the source set changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceScore {
    /// Clamped score in [0, 100]
    pub score: u8,

    /// Qualitative label derived from the score
    pub label: ConfidenceLabel,

    /// Human-readable trail of every adjustment applied
    pub reasoning: Vec<String>,
}

/// Tier mix classification of a source set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierMix {
    Authoritative,
    Standard,
    LowQuality,
}

/// Compute a confidence score from a ranked source set and external flags
///
/// The algorithm starts from `weights.base_score`, applies additive and
/// subtractive adjustments for the source-count bucket, the tier mix,
/// conflict detection, and verification status, then clamps to [0, 100].
/// An empty source set counts as a low-quality tier mix, which guarantees
/// `score <= base_score - 20` no matter which flags are set.
pub fn compute_confidence(
    sources: &[Source],
    flags: ConfidenceFlags,
    weights: &ConfidenceWeights,
) -> ConfidenceScore {
    let mut score = weights.base_score;
    let mut reasoning = Vec::new();

    reasoning.push(format!("base score {}", weights.base_score));

    // Source-count bucket
    let count = sources.len();
    let count_adj = match count {
        0 => weights.no_sources_penalty,
        1..=2 => weights.few_sources_penalty,
        3..=4 => 0,
        _ => weights.many_sources_bonus,
    };
    score += count_adj;
    reasoning.push(format!("{} sources: {:+}", count, count_adj));

    // Tier mix
    let mix = classify_mix(sources);
    let mix_adj = match mix {
        TierMix::Authoritative => weights.authoritative_mix_bonus,
        TierMix::Standard => weights.standard_mix_bonus,
        TierMix::LowQuality => weights.low_quality_mix_penalty,
    };
    score += mix_adj;
    reasoning.push(format!("{:?} tier mix: {:+}", mix, mix_adj));

    // Conflicts
    let conflict_adj = if flags.conflicting {
        weights.conflict_penalty
    } else {
        weights.no_conflict_bonus
    };
    score += conflict_adj;
    reasoning.push(if flags.conflicting {
        format!("conflicting information: {:+}", conflict_adj)
    } else {
        format!("no conflicts: {:+}", conflict_adj)
    });

    // Verification
    let verify_adj = if flags.verification_passed {
        weights.verification_bonus
    } else {
        weights.unverified_penalty
    };
    score += verify_adj;
    reasoning.push(if flags.verification_passed {
        format!("verification passed: {:+}", verify_adj)
    } else {
        format!("verification incomplete: {:+}", verify_adj)
    });

    let clamped = score.clamp(0, 100) as u8;
    let label = label_for(clamped, weights);

    if label == ConfidenceLabel::MediumLikely && flags.conflicting {
        reasoning.push("warning: conflicts detected at medium confidence".to_string());
    }

    ConfidenceScore {
        score: clamped,
        label,
        reasoning,
    }
}

fn classify_mix(sources: &[Source]) -> TierMix {
    if sources.is_empty() {
        // No evidence at all is the weakest possible mix
        return TierMix::LowQuality;
    }

    let t1 = sources.iter().filter(|s| s.tier == Tier::T1).count();
    let t3 = sources.iter().filter(|s| s.tier == Tier::T3).count();
    let total = sources.len();

    if t1 * 2 >= total {
        TierMix::Authoritative
    } else if t3 * 2 > total {
        TierMix::LowQuality
    } else {
        TierMix::Standard
    }
}

fn label_for(score: u8, weights: &ConfidenceWeights) -> ConfidenceLabel {
    if score >= weights.high_verified_threshold {
        ConfidenceLabel::HighVerified
    } else if score >= weights.high_likely_threshold {
        ConfidenceLabel::HighLikely
    } else if score >= weights.medium_threshold {
        ConfidenceLabel::MediumLikely
    } else if score >= weights.low_threshold {
        ConfidenceLabel::LowUncertain
    } else {
        ConfidenceLabel::Unverified
    }
}
