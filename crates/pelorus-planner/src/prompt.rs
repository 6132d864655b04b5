//! LLM prompt engineering for sub-query generation

use pelorus_domain::EvidenceGap;

/// Builds prompts asking the model for a structured sub-query list
pub struct PromptBuilder {
    query: String,
    entity_context: Option<String>,
    gaps: Vec<EvidenceGap>,
}

impl PromptBuilder {
    /// Create a new prompt builder for a user query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            entity_context: None,
            gaps: Vec::new(),
        }
    }

    /// Add entity context (e.g., a previously resolved vessel name)
    pub fn with_entity_context(mut self, context: impl Into<String>) -> Self {
        self.entity_context = Some(context.into());
        self
    }

    /// Target specific evidence gaps (reflexion follow-up planning)
    pub fn with_gaps(mut self, gaps: Vec<EvidenceGap>) -> Self {
        self.gaps = gaps;
        self
    }

    /// Build the complete planning prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(PLANNING_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("User query: {}\n", self.query));
        if let Some(context) = &self.entity_context {
            prompt.push_str(&format!("Known entity context: {}\n", context));
        }

        if !self.gaps.is_empty() {
            prompt.push_str("\nEvidence still missing (target these specifically):\n");
            for gap in &self.gaps {
                let hint = match gap {
                    EvidenceGap::RegistrySource => {
                        "no registry or classification-society record found yet"
                    }
                    EvidenceGap::IdentifierMatch => {
                        "no source confirms the vessel's IMO/MMSI/call sign"
                    }
                    EvidenceGap::OwnerOperator => "no owner or operator information found yet",
                };
                prompt.push_str(&format!("- {}: {}\n", gap.as_str(), hint));
            }
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const PLANNING_INSTRUCTIONS: &str = r#"Decompose the maritime research query below into targeted search sub-queries.
Each sub-query should follow this format:

{
  "text": "the search query to run",
  "purpose": "what evidence this query is meant to surface",
  "priority": "high" | "medium" | "low"
}

Rules:
- Prefer registry-grade sources: vessel registries, classification societies, AIS trackers
- Include at least one identifier-resolution query (IMO number, MMSI, call sign) for named vessels
- Cover ownership and operator information when the query concerns a specific vessel or company
- Keep each sub-query short and self-contained; no boolean operators
- Use "high" for registry and identifier lookups, "medium" for ownership and specifications, "low" for background news"#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Output format (JSON array only, no additional text):
[
  {
    "text": "...",
    "purpose": "...",
    "priority": "high"
  }
]

Remember: Return ONLY valid JSON, no markdown code blocks, no explanations."#;
