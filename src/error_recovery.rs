// src/error_recovery.rs
//! Bounded retry with linearly increasing delay for remote calls.

use crate::constants::{FETCH_RETRY_ATTEMPTS, FETCH_RETRY_BASE_DELAY};
use crate::error::{AppError, FetchError};
use std::time::Duration;

/// How often, and how patiently, a remote call is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Attempt `n` is followed by a pause of `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: FETCH_RETRY_ATTEMPTS,
            base_delay: FETCH_RETRY_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that never waits between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Runs `operation` until it succeeds, fails permanently, or the policy
/// runs out of attempts. The final failure is tagged with `node_id`.
pub async fn retry_with_policy<F, T, Fut>(
    policy: RetryPolicy,
    node_id: &str,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                let delay = policy.delay_after(attempt);
                log::warn!(
                    "Fetching {} failed (attempt {}/{}): {}; retrying after {:?}",
                    node_id,
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            Err(e) => return Err(FetchError::new(node_id, attempt, e)),
        }
    }
}
