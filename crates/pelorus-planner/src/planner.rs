//! Core Query Planner implementation

use crate::budget::budget_sub_queries;
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::parser::parse_plan_response;
use crate::prompt::PromptBuilder;
use crate::templates::{base_templates, gap_templates};
use pelorus_domain::traits::LlmProvider;
use pelorus_domain::{EvidenceGap, PlanStrategy, QueryPlan};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Query Planner decomposes a user query into budgeted sub-queries
///
/// Planning never fails: any problem with the assisting model degrades to
/// the deterministic template fallback.
pub struct QueryPlanner {
    config: PlannerConfig,
}

impl QueryPlanner {
    /// Create a new planner
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Create a planner with default configuration
    pub fn default_config() -> Self {
        Self::new(PlannerConfig::default())
    }

    /// Plan sub-queries for a top-level user query
    pub async fn plan<L>(
        &self,
        query: &str,
        entity_context: Option<&str>,
        llm: Option<&L>,
    ) -> QueryPlan
    where
        L: LlmProvider,
    {
        let prompt = {
            let mut builder = PromptBuilder::new(query);
            if let Some(context) = entity_context {
                builder = builder.with_entity_context(context);
            }
            builder.build()
        };

        let fallback = || base_templates(query, entity_context);
        self.plan_with_fallback(llm, &prompt, fallback).await
    }

    /// Plan targeted follow-up sub-queries for specific evidence gaps
    ///
    /// Used by the reflexion controller; the fallback set carries one
    /// focused sub-query per unmet coverage check.
    pub async fn plan_for_gaps<L>(
        &self,
        query: &str,
        entity_context: Option<&str>,
        gaps: &[EvidenceGap],
        llm: Option<&L>,
    ) -> QueryPlan
    where
        L: LlmProvider,
    {
        let target = entity_context.unwrap_or(query);
        let prompt = {
            let mut builder = PromptBuilder::new(query).with_gaps(gaps.to_vec());
            if let Some(context) = entity_context {
                builder = builder.with_entity_context(context);
            }
            builder.build()
        };

        let fallback = || gap_templates(target, gaps);
        self.plan_with_fallback(llm, &prompt, fallback).await
    }

    async fn plan_with_fallback<L, F>(
        &self,
        llm: Option<&L>,
        prompt: &str,
        fallback: F,
    ) -> QueryPlan
    where
        L: LlmProvider,
        F: Fn() -> Vec<pelorus_domain::SubQuery>,
    {
        if let Some(llm) = llm {
            match self.plan_via_llm(llm, prompt).await {
                Ok(sub_queries) => {
                    info!("planner produced {} llm-guided sub-queries", sub_queries.len());
                    let budgeted = budget_sub_queries(sub_queries, self.config.max_sub_queries);
                    return QueryPlan::new(PlanStrategy::LlmGuided, budgeted);
                }
                Err(e) => {
                    // Planning failures are expected operational noise, never fatal
                    warn!("planning failed, using template fallback: {}", e);
                }
            }
        } else {
            debug!("no llm handle, using template fallback");
        }

        let budgeted = budget_sub_queries(fallback(), self.config.max_sub_queries);
        QueryPlan::new(PlanStrategy::Template, budgeted)
    }

    async fn plan_via_llm<L>(
        &self,
        llm: &L,
        prompt: &str,
    ) -> Result<Vec<pelorus_domain::SubQuery>, PlannerError>
    where
        L: LlmProvider,
    {
        debug!("planning prompt length: {} chars", prompt.len());

        let response = timeout(self.config.planning_timeout(), llm.complete(prompt))
            .await
            .map_err(|_| PlannerError::Timeout)?
            .map_err(|e| PlannerError::Llm(e.to_string()))?;

        parse_plan_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pelorus_domain::Priority;
    use pelorus_llm::MockProvider;

    #[tokio::test]
    async fn test_llm_guided_plan() {
        let provider = MockProvider::new(
            r#"[
                {"text": "Ever Given IMO", "purpose": "id", "priority": "high"},
                {"text": "Ever Given owner", "purpose": "own", "priority": "medium"}
            ]"#,
        );
        let planner = QueryPlanner::default_config();

        let plan = planner.plan("Ever Given", None, Some(&provider)).await;
        assert_eq!(plan.strategy, PlanStrategy::LlmGuided);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.sub_queries[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back() {
        let provider = MockProvider::new("I cannot answer in JSON, sorry!");
        let planner = QueryPlanner::default_config();

        let plan = planner.plan("Ever Given", None, Some(&provider)).await;
        assert_eq!(plan.strategy, PlanStrategy::Template);
        assert!(!plan.is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back() {
        let mut provider = MockProvider::default();
        provider.fail_all();
        let planner = QueryPlanner::default_config();

        let plan = planner.plan("Ever Given", None, Some(&provider)).await;
        assert_eq!(plan.strategy, PlanStrategy::Template);
    }

    #[tokio::test]
    async fn test_absent_llm_uses_templates() {
        let planner = QueryPlanner::default_config();
        let plan = planner
            .plan("Ever Given", Some("Ever Given"), None::<&MockProvider>)
            .await;
        assert_eq!(plan.strategy, PlanStrategy::Template);
        assert_eq!(plan.len(), 5);
    }

    #[tokio::test]
    async fn test_plan_respects_budget() {
        let planner = QueryPlanner::new(PlannerConfig {
            max_sub_queries: 2,
            ..Default::default()
        });
        let plan = planner.plan("q", None, None::<&MockProvider>).await;
        assert_eq!(plan.len(), 2);
        // the two high-priority templates survive
        assert!(plan.sub_queries.iter().all(|s| s.priority == Priority::High));
    }

    #[tokio::test]
    async fn test_gap_plan_fallback() {
        let planner = QueryPlanner::default_config();
        let gaps = [EvidenceGap::IdentifierMatch];
        let plan = planner
            .plan_for_gaps("q", Some("Ever Given"), &gaps, None::<&MockProvider>)
            .await;
        assert_eq!(plan.strategy, PlanStrategy::Template);
        assert_eq!(plan.len(), 1);
        assert!(plan.sub_queries[0].text.contains("Ever Given"));
    }
}
