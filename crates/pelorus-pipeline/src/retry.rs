//! Retry/backoff executor for outbound provider calls

use pelorus_domain::traits::SearchError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Retry policy for one outbound call
///
/// Exponential backoff `base * 2^attempt`, capped at `max_delay_ms`, plus
/// uniform jitter in `[0, base_delay_ms]`. Only transient errors are
/// retried; each attempt carries its own timeout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds
    pub base_delay_ms: u64,

    /// Backoff cap in milliseconds (pre-jitter)
    pub max_delay_ms: u64,

    /// Per-attempt timeout in seconds
    pub call_timeout_secs: u64,
}

impl RetryPolicy {
    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Per-attempt timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Backoff delay for a zero-based attempt number, pre-jitter
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let backoff = self
            .base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_delay_ms);
        Duration::from_millis(backoff.max(self.base_delay_ms))
    }

    fn jitter(&self) -> Duration {
        let jitter_ms = rand::thread_rng().gen_range(0..=self.base_delay_ms);
        Duration::from_millis(jitter_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 250,
            max_delay_ms: 4_000,
            call_timeout_secs: 10,
        }
    }
}

/// What one retried call produced
#[derive(Debug)]
pub struct RetryOutcome<T> {
    /// Final result after all attempts
    pub result: Result<T, SearchError>,

    /// Number of retries performed (attempts minus one, unless it
    /// succeeded earlier)
    pub retries: u32,
}

/// Run an operation under the retry policy
///
/// The operation is re-invoked for each attempt. A timed-out attempt is
/// treated as `SearchError::Timeout`; permanent errors short-circuit.
pub async fn execute_with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    let mut attempt: u32 = 0;

    loop {
        let outcome = match timeout(policy.call_timeout(), operation()).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout),
        };

        match outcome {
            Ok(value) => {
                return RetryOutcome {
                    result: Ok(value),
                    retries: attempt,
                }
            }
            Err(error) if error.is_transient() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for_attempt(attempt) + policy.jitter();
                debug!(attempt, ?delay, "transient failure, backing off: {}", error);
                sleep(delay).await;
                attempt += 1;
            }
            Err(error) => {
                return RetryOutcome {
                    result: Err(error),
                    retries: attempt,
                }
            }
        }
    }
}
