// src/blockchain/retry.rs

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::error::UpstreamError;

/// Per-call timeout plus a bounded retry count, applied to every upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Extra attempts after the first one; 0 disables retries.
    pub max_retries: u32,
    /// Delay before retry `n` is `backoff * n`.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 0,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_retries: u32, backoff: Duration) -> Self {
        Self {
            timeout,
            max_retries,
            backoff,
        }
    }

    /// Runs `op` until it succeeds, fails with a non-transient error, or the
    /// retry budget is spent.
    pub async fn run<T, F, Fut>(&self, method: &str, mut op: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let mut attempt = 0u32;
        loop {
            let outcome = match timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(UpstreamError::Timeout {
                    method: method.to_string(),
                    after: self.timeout,
                }),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.backoff.saturating_mul(attempt);
                    warn!(
                        "{} failed (attempt {}/{}), retrying in {:?}: {}",
                        method,
                        attempt,
                        self.max_retries + 1,
                        delay,
                        e
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn busy() -> UpstreamError {
        UpstreamError::Transport {
            method: "ankr_getLogs".into(),
            message: "HTTP 503".into(),
            retryable: true,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn default_policy_makes_a_single_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = RetryPolicy::default()
            .run("ankr_getLogs", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(busy()) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_within_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(Duration::from_secs(5), 2, Duration::from_millis(10));
        let result = policy
            .run("ankr_getLogs", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(busy())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_backoff_saturates() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(Duration::from_secs(5), 2, Duration::MAX);
        let result: Result<(), _> = policy
            .run("ankr_getLogs", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(busy()) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_failures_are_not_retried() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(Duration::from_secs(5), 3, Duration::from_millis(10));
        let result: Result<(), _> = policy
            .run("ankr_getTokenPrice", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(UpstreamError::Rpc {
                        method: "ankr_getTokenPrice".into(),
                        code: -32602,
                        message: "invalid params".into(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(UpstreamError::Rpc { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_attempts_time_out() {
        let policy = RetryPolicy::new(Duration::from_millis(100), 0, Duration::ZERO);
        let result: Result<(), _> = policy
            .run("ankr_getBlocks", || async {
                sleep(Duration::from_secs(10)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(UpstreamError::Timeout { .. })));
    }
}
