//! Pelorus LLM Provider Layer
//!
//! Pluggable language-model provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `pelorus-domain`. The model is an assisting collaborator only: the
//! pipeline treats its output as untrusted text and degrades to
//! deterministic fallbacks when a call fails or parses badly.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration

#![warn(missing_docs)]

pub mod ollama;

use async_trait::async_trait;
use pelorus_domain::traits::LlmProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use pelorus_llm::MockProvider;
/// use pelorus_domain::traits::LlmProvider;
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::new("[]");
/// let result = provider.complete("any prompt").await.unwrap();
/// assert_eq!(result, "[]");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
    fail_always: Arc<Mutex<bool>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            fail_always: Arc::new(Mutex::new(false)),
        }
    }

    /// Add a specific response for prompts containing the given marker
    ///
    /// Matching is by substring so callers don't need to reproduce full
    /// prompt text in tests.
    pub fn add_response(&mut self, prompt_marker: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt_marker.into(), response.into());
    }

    /// Make every completion call fail
    pub fn fail_all(&mut self) {
        *self.fail_always.lock().unwrap() = true;
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if *self.fail_always.lock().unwrap() {
            return Err(LlmError::Other("Mock failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        for (marker, response) in responses.iter() {
            if prompt.contains(marker.as_str()) {
                return Ok(response.clone());
            }
        }

        Ok(self.default_response.clone())
    }
}
