//! Rate-limit-aware retry wrapped around single executor calls.
//!
//! The policy keeps two independent budgets per logical call: one for
//! rate limiting (429s, honoring `Retry-After`) and a smaller one for
//! transient transport failures. Semantic GraphQL errors are never
//! retried. Each call to [`RetryPolicy::run`] starts with fresh
//! budgets, so nothing leaks between unrelated requests.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::RetryClass;
use crate::ClientError;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep for the given duration, then retry.
    RetryAfter(Duration),
    /// Give up.
    DoNotRetry,
}

/// Retry configuration for one logical request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum rate-limited attempts, including the first request.
    pub max_attempts: u32,
    /// Retries allowed for transient transport failures; a distinct,
    /// smaller budget than `max_attempts`.
    pub max_transport_retries: u32,
    /// First backoff delay when the server sends no `Retry-After`.
    pub base_delay: Duration,
    /// Backoff ceiling.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            max_transport_retries: 2,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// The exponential backoff delay after `retries` failed attempts:
    /// the base delay doubled per attempt, capped at `max_delay`.
    pub fn backoff_for(&self, retries: u32) -> Duration {
        let exp = 2_u32.saturating_pow(retries);
        self.base_delay.saturating_mul(exp).min(self.max_delay)
    }

    /// Decide what to do with `error` after `rate_limit_retries` and
    /// `transport_retries` retries have already happened.
    ///
    /// Pure function of its inputs, so backoff schedules are testable
    /// without sleeping.
    pub fn decide(
        &self,
        error: &ClientError,
        rate_limit_retries: u32,
        transport_retries: u32,
    ) -> RetryDecision {
        match error.retry_class() {
            RetryClass::RateLimit => {
                if rate_limit_retries + 1 >= self.max_attempts {
                    return RetryDecision::DoNotRetry;
                }
                let delay = match error {
                    ClientError::RateLimited {
                        retry_after: Some(retry_after),
                    } => *retry_after,
                    _ => self.backoff_for(rate_limit_retries),
                };
                RetryDecision::RetryAfter(delay)
            }
            RetryClass::Transport => {
                if transport_retries >= self.max_transport_retries {
                    return RetryDecision::DoNotRetry;
                }
                RetryDecision::RetryAfter(self.backoff_for(transport_retries))
            }
            RetryClass::Fatal => RetryDecision::DoNotRetry,
        }
    }

    /// Drive `op` until it succeeds, a budget runs out, or a fatal
    /// error surfaces. Backoff sleeps abort promptly on cancellation.
    pub(crate) async fn run<T, F, Fut>(
        &self,
        cancel: &CancellationToken,
        mut op: F,
    ) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let mut rate_limit_retries = 0_u32;
        let mut transport_retries = 0_u32;
        loop {
            let err = match op().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            let class = err.retry_class();
            match self.decide(&err, rate_limit_retries, transport_retries) {
                RetryDecision::RetryAfter(delay) => {
                    match class {
                        RetryClass::RateLimit => rate_limit_retries += 1,
                        RetryClass::Transport => transport_retries += 1,
                        RetryClass::Fatal => {}
                    }
                    debug!(?delay, ?err, "retrying after backoff");
                    tokio::select! {
                        () = cancel.cancelled() => return Err(ClientError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                RetryDecision::DoNotRetry => {
                    return Err(match class {
                        RetryClass::Fatal => err,
                        _ => ClientError::RetryExhausted {
                            attempts: 1 + rate_limit_retries + transport_retries,
                            source: Box::new(err),
                        },
                    });
                }
            }
        }
    }
}
