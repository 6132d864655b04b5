//! The research pipeline entry point

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::metrics::RetrievalMetrics;
use crate::progress::NullSink;
use crate::reflexion::{
    coverage_gaps, is_topically_relevant, transition, Decision, ReflexionState,
};
use crate::retrieval::RetrievalExecutor;
use crate::synthesis::synthesize;
use async_trait::async_trait;
use pelorus_citation::{CitationEnforcementResult, CitationEnforcer};
use pelorus_domain::confidence::compute_confidence;
use pelorus_domain::traits::{CacheStore, LlmProvider, ProgressSink, SearchProvider};
use pelorus_domain::{
    ConfidenceFlags, ConfidenceScore, Diagnostics, ProgressEvent, RequestId, Source,
    ValidationResult,
};
use pelorus_planner::QueryPlanner;
use pelorus_ranker::{aggregate, RankedSet};
use pelorus_validator::{is_entity_query, EntityValidator};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Placeholder LLM type for pipelines running without a language model
///
/// Every completion fails, which downstream stages already treat as the
/// degraded path (template planning, no synthesized answer).
pub struct NoLlm;

#[async_trait]
impl LlmProvider for NoLlm {
    type Error = String;

    async fn complete(&self, _prompt: &str) -> Result<String, Self::Error> {
        Err("no language model configured".to_string())
    }
}

/// Everything one research request produced
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    /// Trace identifier for this request
    pub request_id: RequestId,

    /// Ranked, deduplicated evidence
    pub ranked_sources: Vec<Source>,

    /// Evidentiary-strength score for the ranked set
    pub confidence: ConfidenceScore,

    /// Entity validation result (identifiable-entity queries only)
    pub validation: Option<ValidationResult>,

    /// Synthesized answer with citations enforced, if a model produced one
    pub answer: Option<String>,

    /// Citation enforcement accounting
    pub citation: CitationEnforcementResult,

    /// Stable diagnostics payload
    pub diagnostics: Diagnostics,
}

/// The multi-stage research orchestration pipeline
///
/// Generic over its collaborators so tests can substitute deterministic
/// doubles for the search provider, cache store, and language model.
pub struct ResearchPipeline<S, C, L>
where
    S: SearchProvider,
    C: CacheStore,
    L: LlmProvider,
{
    provider: S,
    cache: C,
    llm: Option<L>,
    sink: Arc<dyn ProgressSink>,
    planner: QueryPlanner,
    validator: EntityValidator,
    enforcer: CitationEnforcer,
    config: PipelineConfig,
}

impl<S, C> ResearchPipeline<S, C, NoLlm>
where
    S: SearchProvider,
    C: CacheStore,
{
    /// Build a pipeline with no language model
    ///
    /// Planning uses deterministic templates and no answer is synthesized;
    /// retrieval, ranking, validation, and reflexion run normally.
    pub fn without_llm(provider: S, cache: C, config: PipelineConfig) -> Result<Self, PipelineError> {
        Self::new(provider, cache, None, config)
    }
}

impl<S, C, L> ResearchPipeline<S, C, L>
where
    S: SearchProvider,
    C: CacheStore,
    L: LlmProvider,
{
    /// Build a pipeline over the given collaborators
    ///
    /// Configuration is validated here, fail-fast: a bad configuration
    /// never accepts a request.
    pub fn new(
        provider: S,
        cache: C,
        llm: Option<L>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        Ok(Self {
            provider,
            cache,
            llm,
            sink: Arc::new(NullSink),
            planner: QueryPlanner::new(config.planner.clone()),
            validator: EntityValidator::new(config.validator.clone()),
            enforcer: CitationEnforcer::new(config.citation),
            config,
        })
    }

    /// Attach a progress sink
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run one research request end to end
    ///
    /// Never fails: every collaborator problem degrades locally and the
    /// diagnostics record what was lost. Callers wanting a deadline wrap
    /// this in their own timeout and substitute a fallback on expiry.
    pub async fn run(&self, query: &str, entity_context: Option<&str>) -> ResearchOutcome {
        let request_id = RequestId::new();
        info!(%request_id, query, "research request started");

        // Plan
        let plan = self
            .planner
            .plan(query, entity_context, self.llm.as_ref())
            .await;
        self.sink.emit(ProgressEvent::PlanningComplete {
            sub_queries: plan.len(),
            strategy: plan.strategy.as_str(),
        });

        // Retrieve (cache-first, concurrent, retried)
        let executor = RetrievalExecutor::new(
            &self.provider,
            &self.cache,
            self.config.retry,
            self.config.cache_ttl_seconds,
        );
        let (raw, mut metrics) = executor.execute(&plan, entity_context, self.sink.as_ref()).await;

        // Aggregate & rank
        let mut total_found = raw.len();
        let mut ranked = aggregate(raw, query, &self.config.ranker);
        self.sink.emit(ProgressEvent::RankingComplete {
            total_found,
            total_ranked: ranked.total_ranked(),
        });

        // Validate & score (identifiable-entity queries also refine)
        let entity = is_entity_query(query, entity_context);
        let mut validation = entity.then(|| self.validator.validate(query, &ranked.sources, None));
        let mut confidence = self.score_confidence(&ranked.sources, validation.as_ref());

        let mut reflexion_iterations = 0;
        if let Some(current_validation) = validation.take() {
            let (refined, refined_validation, refined_confidence, iterations) = self
                .run_reflexion(
                    query,
                    entity_context,
                    ranked,
                    current_validation,
                    confidence,
                    &executor,
                    &mut metrics,
                    &mut total_found,
                )
                .await;
            ranked = refined;
            validation = Some(refined_validation);
            confidence = refined_confidence;
            reflexion_iterations = iterations;
        }

        // Synthesize & enforce citations
        let answer = synthesize(self.llm.as_ref(), query, &ranked.sources).await;
        let citation = self
            .enforcer
            .enforce(answer.as_deref().unwrap_or(""), &ranked.sources);
        let answer = answer.map(|_| citation.enforced_text.clone());

        self.sink.emit(ProgressEvent::MetricsSnapshot {
            cache_hits: metrics.cache_hits,
            cache_misses: metrics.cache_misses,
            retries: metrics.retries,
        });

        let diagnostics = Diagnostics {
            tier_counts: ranked.tier_counts,
            dedup_percent: if total_found > 0 {
                (total_found - ranked.total_ranked()) as f64 / total_found as f64
            } else {
                0.0
            },
            total_found,
            total_ranked: ranked.total_ranked(),
            reflexion_iterations,
        };

        info!(
            %request_id,
            score = confidence.score,
            sources = diagnostics.total_ranked,
            iterations = reflexion_iterations,
            "research request complete ({})",
            metrics.summary()
        );

        ResearchOutcome {
            request_id,
            ranked_sources: ranked.sources,
            confidence,
            validation,
            answer,
            citation,
            diagnostics,
        }
    }

    /// Compute confidence for the current evidence and emit the checkpoint
    fn score_confidence(
        &self,
        sources: &[Source],
        validation: Option<&ValidationResult>,
    ) -> ConfidenceScore {
        let flags = ConfidenceFlags {
            conflicting: self.validator.detect_identifier_conflicts(sources),
            verification_passed: validation.is_some_and(|v| v.is_match),
        };
        let confidence = compute_confidence(sources, flags, &self.config.confidence);
        self.sink.emit(ProgressEvent::ConfidenceComputed {
            score: confidence.score,
        });
        confidence
    }

    /// Drive the reflexion loop until convergence or abort
    ///
    /// Iterations are strictly sequential; only the retrieval inside one
    /// iteration fans out concurrently.
    #[allow(clippy::too_many_arguments)]
    async fn run_reflexion<'a>(
        &self,
        query: &str,
        entity_context: Option<&str>,
        mut ranked: RankedSet,
        mut validation: ValidationResult,
        mut confidence: ConfidenceScore,
        executor: &RetrievalExecutor<'a, S, C>,
        metrics: &mut RetrievalMetrics,
        total_found: &mut usize,
    ) -> (RankedSet, ValidationResult, ConfidenceScore, u32) {
        let mut state = ReflexionState::new();

        loop {
            let gaps = coverage_gaps(&ranked.sources, &validation);
            match transition(&state, gaps.len(), self.config.max_reflexion_iterations) {
                Decision::Converge => {
                    info!(iteration = state.iteration, "reflexion converged");
                    break;
                }
                Decision::Abort(reason) => {
                    info!(iteration = state.iteration, ?reason, "reflexion aborted");
                    break;
                }
                Decision::Refine => {
                    state.begin_refinement(gaps.len());
                    self.sink.emit(ProgressEvent::ReflexionIteration {
                        iteration: state.iteration,
                        gap_count: gaps.len(),
                    });

                    let plan = self
                        .planner
                        .plan_for_gaps(query, entity_context, &gaps, self.llm.as_ref())
                        .await;
                    let (new_raw, round_metrics) =
                        executor.execute(&plan, entity_context, self.sink.as_ref()).await;
                    metrics.merge(&round_metrics);
                    *total_found += new_raw.len();

                    let relevant: Vec<Source> = new_raw
                        .into_iter()
                        .filter(|s| {
                            is_topically_relevant(
                                s,
                                &self.config.reflexion_topic_keywords,
                                self.config.reflexion_min_content_len,
                            )
                        })
                        .collect();
                    debug!(
                        iteration = state.iteration,
                        relevant = relevant.len(),
                        "refinement sources after topical filter"
                    );

                    let known: HashSet<String> =
                        ranked.sources.iter().map(|s| s.canonical_url()).collect();

                    let mut combined = ranked.sources.clone();
                    combined.extend(relevant);
                    let merged = aggregate(combined, query, &self.config.ranker);

                    let has_new_unique = merged
                        .sources
                        .iter()
                        .any(|s| !known.contains(&s.canonical_url()));
                    if !has_new_unique {
                        info!(
                            iteration = state.iteration,
                            "reflexion aborted: no new unique source survived re-aggregation"
                        );
                        break;
                    }

                    ranked = merged;
                    validation = self.validator.validate(query, &ranked.sources, None);
                    confidence = self.score_confidence(&ranked.sources, Some(&validation));
                }
            }
        }

        (ranked, validation, confidence, state.iteration)
    }
}
