//! Bounded retry with exponential backoff and a per-attempt timeout.

use std::future::Future;
use std::time::Duration;

use crate::error::AiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Same timeout, no retries.
    pub fn single_attempt(&self) -> Self {
        Self {
            max_attempts: 1,
            ..*self
        }
    }

    /// Wait after failed attempt `attempt` (0-based): base * 2^attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

/// Run `op` until it succeeds, fails with a non-retriable error, or the
/// attempt budget is spent. Attempts never overlap.
///
/// `op` receives the 0-based attempt number. An attempt that outlives
/// `policy.attempt_timeout` is dropped and counts as `AiError::Timeout`.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, AiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        let result = match tokio::time::timeout(policy.attempt_timeout, op(attempt)).await {
            Ok(r) => r,
            Err(_) => Err(AiError::Timeout),
        };

        let err = match result {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };

        tracing::warn!(
            label,
            attempt = attempt + 1,
            class = err.class(),
            error = %err,
            "attempt failed"
        );

        if !err.is_retriable() || attempt + 1 >= attempts {
            return Err(err);
        }

        tokio::time::sleep(policy.delay(attempt)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_delay_doubles() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay(0), Duration::from_secs(1));
        assert_eq!(p.delay(1), Duration::from_secs(2));
        assert_eq!(p.delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_saturates() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay(40), p.delay(16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retriable_stops_immediately() {
        let calls = Cell::new(0);
        let res: Result<(), _> = with_retry(&RetryPolicy::default(), "test", |_| {
            calls.set(calls.get() + 1);
            async { Err(AiError::BadRequest("nope".into())) }
        })
        .await;
        assert!(matches!(res, Err(AiError::BadRequest(_))));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let res: Result<(), _> = with_retry(&RetryPolicy::default(), "test", |_| {
            calls.set(calls.get() + 1);
            async { Err(AiError::Network("down".into())) }
        })
        .await;
        assert!(matches!(res, Err(AiError::Network(_))));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_times_out_then_retries() {
        let policy = RetryPolicy {
            attempt_timeout: Duration::from_secs(5),
            ..RetryPolicy::default()
        };
        let res = with_retry(&policy, "test", |attempt| async move {
            if attempt == 0 {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok::<_, AiError>(attempt)
        })
        .await;
        assert_eq!(res, Ok(1));
    }
}
