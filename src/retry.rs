//! Bounded retries for AWS API calls
//!
//! Every provider call in this crate runs under a `RetryPolicy`. Reads are
//! safe to repeat and retry aggressively; mutations get fewer attempts so a
//! flapping delete surfaces as a per-resource error quickly. Throttling
//! responses back off from a higher floor than other transient failures.

use crate::error::{IsRetryable, Result, TagctlError};
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Message fragments AWS services use for rate limiting
const THROTTLE_MARKERS: [&str; 4] = [
    "Throttling",
    "RequestLimitExceeded",
    "TooManyRequests",
    "SlowDown",
];

/// True when the error is AWS telling us to slow down
pub fn is_throttling(error: &TagctlError) -> bool {
    let text = error.to_string();
    THROTTLE_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Bounded exponential backoff for one kind of provider call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    /// Policy for describe/list calls
    pub fn for_read() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Policy for delete/modify calls
    pub fn for_mutation() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(20),
        }
    }

    /// Equal-jitter backoff; throttling quadruples the base step
    fn backoff(&self, attempt: u32, throttled: bool) -> Duration {
        let base = if throttled {
            self.base_delay * 4
        } else {
            self.base_delay
        };
        let exponential = base.as_millis() as f64 * 2f64.powi(attempt as i32);
        let capped = exponential.min(self.max_delay.as_millis() as f64) as u64;
        // Half fixed, half random, so concurrent workers spread out
        Duration::from_millis(capped / 2 + fastrand::u64(0..=capped / 2))
    }

    /// Run `f` until it succeeds, fails non-retryably, or attempts run out
    pub async fn run<F, Fut, T>(&self, operation: &str, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        info!("{} succeeded after {} retries", operation, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if !e.is_retryable() => {
                    warn!("{} failed non-retryably: {}", operation, e);
                    return Err(e);
                }
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_attempts {
                        return Err(TagctlError::Retryable {
                            attempt,
                            max_attempts: self.max_attempts,
                            reason: format!("{} failed: {}", operation, e),
                            source: Some(Box::new(e)),
                        });
                    }
                    let throttled = is_throttling(&e);
                    let delay = self.backoff(attempt, throttled);
                    warn!(
                        "{} failed (attempt {}/{}{}), retrying in {:?}: {}",
                        operation,
                        attempt,
                        self.max_attempts,
                        if throttled { ", throttled" } else { "" },
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn test_succeeds_first_attempt() {
        let policy = RetryPolicy::for_read();
        let result: Result<u32> = policy.run("noop", || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retries_transient_failure() {
        let policy = fast_policy(3);
        let calls = AtomicU32::new(0);
        let result: Result<u32> = policy
            .run("flaky", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(TagctlError::Aws("Throttling: Rate exceeded".to_string()))
                    } else {
                        Ok(7)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_aborts_immediately() {
        let policy = fast_policy(5);
        let calls = AtomicU32::new(0);
        let result: Result<u32> = policy
            .run("validate", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(TagctlError::Validation {
                        field: "subnet_id".to_string(),
                        reason: "bad".to_string(),
                    })
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_retryable_error() {
        let policy = fast_policy(3);
        let calls = AtomicU32::new(0);
        let result: Result<u32> = policy
            .run("down", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(TagctlError::Aws("service unavailable".to_string())) }
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(TagctlError::Retryable { attempt: 3, max_attempts: 3, .. })
        ));
    }

    #[test]
    fn test_throttle_classification() {
        assert!(is_throttling(&TagctlError::Aws(
            "Throttling: Rate exceeded".to_string()
        )));
        assert!(is_throttling(&TagctlError::Fetch {
            resource_id: "subnet-1".to_string(),
            message: "RequestLimitExceeded".to_string(),
        }));
        assert!(!is_throttling(&TagctlError::Aws(
            "AccessDenied: not authorized".to_string()
        )));
        assert!(!is_throttling(&TagctlError::Cancelled));
    }

    #[test]
    fn test_throttled_backoff_is_longer() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
        };
        // Equal jitter keeps every delay at or above half the exponential step
        let plain = policy.backoff(1, false);
        let throttled = policy.backoff(1, true);
        assert!(plain >= Duration::from_millis(100));
        assert!(throttled >= Duration::from_millis(400));
    }
}
