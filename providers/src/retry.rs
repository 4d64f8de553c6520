//! Retry policy with exponential backoff.
//!
//! # Retry Policy
//!
//! - Max retries: 5 (6 total attempts)
//! - Initial delay: 1s, doubled before every retry (1s, 2s, 4s, 8s, 16s)
//! - Max delay: 16 seconds
//! - Jitter: none by default; `jitter_factor` enables down-jitter
//!
//! Every failure is retryable. The caller decides what a failure is by
//! returning `Err` from the attempt closure.

use std::{fmt, future::Future, time::Duration};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries (not counting the initial request).
    pub max_retries: u32,
    /// Backoff delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum backoff delay.
    pub max_delay: Duration,
    /// Down-jitter factor (0.25 = up to 25% shorter). `0.0` disables jitter.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
            jitter_factor: 0.0,
        }
    }
}

impl RetryConfig {
    /// Total number of attempts, the initial one included.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Calculate the delay before a retry.
///
/// `backoff_step` is 0 before the first retry, 1 before the second, etc.
#[must_use]
pub fn calculate_retry_delay(backoff_step: u32, config: &RetryConfig) -> Duration {
    // Exponential backoff: initial_delay * 2^backoff_step
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step as i32);
    let capped = base.min(config.max_delay.as_secs_f64());

    if config.jitter_factor <= 0.0 {
        return Duration::from_secs_f64(capped);
    }

    // Down-jitter: multiply by random factor in [1 - jitter_factor, 1.0]
    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor.min(1.0);
    Duration::from_secs_f64(capped * jitter)
}

/// Outcome of a retried operation.
#[derive(Debug)]
pub enum RetryOutcome<T, E> {
    Success(T),
    /// Every attempt failed; `last` is the failure of the final attempt.
    Exhausted { attempts: u32, last: E },
}

/// Run `attempt` until it succeeds or the retry budget is spent.
///
/// The closure receives the 1-based attempt number. Between attempts the
/// task sleeps for [`calculate_retry_delay`].
pub async fn send_with_retry<T, E, F, Fut>(config: &RetryConfig, mut attempt: F) -> RetryOutcome<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt_number = 1;

    loop {
        let error = match attempt(attempt_number).await {
            Ok(value) => return RetryOutcome::Success(value),
            Err(error) => error,
        };

        let retries_used = attempt_number - 1;
        if retries_used >= config.max_retries {
            return RetryOutcome::Exhausted {
                attempts: attempt_number,
                last: error,
            };
        }

        let delay = calculate_retry_delay(retries_used, config);
        tracing::debug!(
            error = %error,
            retry_count = attempt_number,
            delay_ms = delay.as_millis(),
            "Retrying request after failure"
        );
        tokio::time::sleep(delay).await;
        attempt_number += 1;
    }
}
