//! Retry loop with exponential backoff.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Retry policy for remote catalog fetches.
///
/// Total attempts = `max_retries + 1`. The delay before retry `k` (0-based)
/// is `base_delay * 2^k`, without jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Single attempt, no backoff.
    pub const fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay awaited before retry `attempt` (0-based). Saturates on overflow.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        2_u32
            .checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Runs `operation` until it succeeds, fails terminally, or the attempt
    /// budget is spent. `operation` receives the 0-based attempt number.
    ///
    /// A cancelled token before an attempt or during a backoff sleep ends the
    /// loop with [`FetchError::Aborted`]. Otherwise the error of the last
    /// attempt is returned unchanged.
    pub async fn execute<T, F, Fut>(
        &self,
        cancel: Option<&CancellationToken>,
        mut operation: F,
    ) -> Result<T, FetchError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let total = self.total_attempts();
        let mut attempt = 0_u32;

        loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                debug!(attempt = attempt + 1, "cancelled before attempt");
                return Err(FetchError::aborted());
            }

            debug!(attempt = attempt + 1, total, "fetch attempt");
            let error = match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if attempt >= self.max_retries || !is_retryable(&error) {
                debug!(
                    attempt = attempt + 1,
                    code = error.code(),
                    "giving up: {error}"
                );
                return Err(error);
            }

            let delay = self.delay_for_attempt(attempt);
            warn!(
                attempt = attempt + 1,
                total,
                code = error.code(),
                delay_ms = delay.as_millis() as u64,
                "retryable fetch failure: {error}"
            );

            match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => return Err(FetchError::aborted()),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }

            attempt += 1;
        }
    }
}

/// Whether a failed attempt may be retried.
///
/// Timeouts, transport failures and 5xx responses are transient. Client
/// errors, parse failures, cache misses and cancellation are terminal.
pub fn is_retryable(error: &FetchError) -> bool {
    match error {
        FetchError::NetworkTimeout { .. } | FetchError::NetworkError { .. } => true,
        FetchError::ServerError { status, .. } => (500..=599).contains(status),
        FetchError::ParseError { .. } | FetchError::NoCache { .. } | FetchError::Aborted { .. } => {
            false
        }
    }
}
