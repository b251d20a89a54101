//! Bounded retry with linear backoff.
//!
//! The profile store is eventually consistent: a read issued right after
//! account creation may see nothing. Callers express "not there yet" as
//! `Ok(None)` and hard failures as `Err(_)`; both are retried up to the
//! attempt cap.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Sleep before attempt N+1 is `backoff_step * N` (increasing).
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts,
            backoff_step,
        }
    }

    fn backoff_before(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt.saturating_sub(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}

/// All attempts exhausted without the operation producing a value.
#[derive(Debug, Error)]
#[error("operation exhausted {attempts} attempts")]
pub struct RetryError<E: std::fmt::Debug> {
    pub attempts: u32,
    pub last_error: Option<E>,
}

/// Run `op` until it yields `Ok(Some(value))`, up to `policy.max_attempts`
/// times. The attempt number (1-based) is passed to `op` for logging.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: RetryPolicy,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    E: std::fmt::Debug,
{
    let mut last_error = None;
    for attempt in 1..=policy.max_attempts {
        if attempt > 1 {
            tokio::time::sleep(policy.backoff_before(attempt)).await;
        }
        match op(attempt).await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => last_error = None,
            Err(e) => last_error = Some(e),
        }
    }
    Err(RetryError {
        attempts: policy.max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn returns_first_value() {
        let calls = AtomicU32::new(0);
        let result: Result<i32, RetryError<&str>> =
            retry_with_backoff(RetryPolicy::new(3, Duration::ZERO), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(Some(7)) }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_value_appears() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, RetryError<&str>> =
            retry_with_backoff(RetryPolicy::new(3, Duration::ZERO), |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Ok(None)
                    } else {
                        Ok(Some("found"))
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), "found");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_keeps_last_error() {
        let result: Result<i32, RetryError<&str>> =
            retry_with_backoff(RetryPolicy::new(2, Duration::ZERO), |_| async {
                Err("store down")
            })
            .await;
        let err = result.unwrap_err();
        assert_eq!(err.attempts, 2);
        assert_eq!(err.last_error, Some("store down"));
    }

    #[tokio::test]
    async fn exhaustion_on_missing_value_has_no_error() {
        let result: Result<i32, RetryError<&str>> =
            retry_with_backoff(RetryPolicy::new(2, Duration::ZERO), |_| async { Ok(None) }).await;
        let err = result.unwrap_err();
        assert_eq!(err.attempts, 2);
        assert!(err.last_error.is_none());
    }
}
