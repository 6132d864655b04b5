//! Answer synthesis through the LLM seam
//!
//! The answer content itself is the model's business; this module only
//! shapes the prompt from the ranked evidence and degrades to no answer
//! when the model is absent or fails. Citation density is enforced
//! afterwards by the citation enforcer, not here.

use pelorus_domain::traits::LlmProvider;
use pelorus_domain::Source;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Deadline for one synthesis call
pub const SYNTHESIS_TIMEOUT_SECS: u64 = 30;

/// How many ranked sources the prompt quotes
const PROMPT_SOURCE_LIMIT: usize = 8;

/// How much of each source's content the prompt quotes
const PROMPT_SNIPPET_CHARS: usize = 400;

/// Build the synthesis prompt from the query and ranked sources
pub fn build_answer_prompt(query: &str, sources: &[Source]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Answer the maritime research question below using only the numbered sources. \
         Cite sources inline as [n]. Be precise about identifiers, measurements, and dates.\n\n",
    );
    prompt.push_str(&format!("Question: {}\n\nSources:\n", query));

    for (idx, source) in sources.iter().take(PROMPT_SOURCE_LIMIT).enumerate() {
        let snippet: String = source.content.chars().take(PROMPT_SNIPPET_CHARS).collect();
        prompt.push_str(&format!(
            "[{}] {} ({})\n{}\n\n",
            idx + 1,
            source.title,
            source.url,
            snippet
        ));
    }

    prompt.push_str("Answer:");
    prompt
}

/// Synthesize an answer, or `None` when the model is absent or fails
pub async fn synthesize<L>(llm: Option<&L>, query: &str, sources: &[Source]) -> Option<String>
where
    L: LlmProvider,
{
    let llm = llm?;
    if sources.is_empty() {
        return None;
    }

    let prompt = build_answer_prompt(query, sources);

    match timeout(Duration::from_secs(SYNTHESIS_TIMEOUT_SECS), llm.complete(&prompt)).await {
        Ok(Ok(answer)) if !answer.trim().is_empty() => Some(answer),
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            warn!("synthesis failed, returning sources without answer: {}", e);
            None
        }
        Err(_) => {
            warn!("synthesis timed out, returning sources without answer");
            None
        }
    }
}
