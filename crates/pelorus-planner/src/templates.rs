//! Deterministic fallback sub-query templates
//!
//! Used whenever the assisting model is absent, fails, or returns
//! malformed output. Templates are plain functions of the query text so
//! fallback planning is fully reproducible.

use pelorus_domain::{EvidenceGap, Priority, SubQuery};

/// Base template set derived from the raw query alone
pub fn base_templates(query: &str, entity_context: Option<&str>) -> Vec<SubQuery> {
    let target = entity_context.unwrap_or(query).trim();

    vec![
        SubQuery::new(query.trim(), "direct lookup of the user's question", Priority::High),
        SubQuery::new(
            format!("{} vessel registry IMO", target),
            "registry-grade identification",
            Priority::High,
        ),
        SubQuery::new(
            format!("{} owner operator company", target),
            "ownership and management",
            Priority::Medium,
        ),
        SubQuery::new(
            format!("{} specifications tonnage class", target),
            "technical particulars",
            Priority::Medium,
        ),
        SubQuery::new(
            format!("{} latest news", target),
            "recent developments",
            Priority::Low,
        ),
    ]
}

/// Gap-targeted template set for reflexion follow-ups
///
/// One focused sub-query per unmet coverage check.
pub fn gap_templates(target: &str, gaps: &[EvidenceGap]) -> Vec<SubQuery> {
    let target = target.trim();
    gaps.iter()
        .map(|gap| match gap {
            EvidenceGap::RegistrySource => SubQuery::new(
                format!("{} Equasis registry classification society record", target),
                "find a registry-class source",
                Priority::High,
            ),
            EvidenceGap::IdentifierMatch => SubQuery::new(
                format!("{} IMO number MMSI call sign", target),
                "confirm vessel identifiers",
                Priority::High,
            ),
            EvidenceGap::OwnerOperator => SubQuery::new(
                format!("{} registered owner ship manager operator", target),
                "find owner/operator information",
                Priority::Medium,
            ),
        })
        .collect()
}
