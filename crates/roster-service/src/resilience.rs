//! Deadlines and the bounded invalidation retry.

use roster_core::{RosterError, RosterResult};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Wraps an async operation with a timeout.
///
/// Expiry yields [`RosterError::Timeout`].
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> RosterResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = RosterResult<T>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| RosterError::Timeout(format!("Operation timed out after {:?}", duration)))?
}

/// How hard to try removing a cache entry after a write.
///
/// Only retriable failures (unavailable, timeout) are retried. A single
/// attempt means no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidationPolicy {
    /// Total attempts, including the first. Never less than one.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl Default for InvalidationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::from_millis(50),
        }
    }
}

impl InvalidationPolicy {
    /// Creates a policy with the given number of attempts.
    #[must_use]
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `f` until it succeeds, fails terminally, or attempts run out.
    pub async fn execute<F, Fut>(&self, mut f: F) -> RosterResult<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RosterResult<()>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match f().await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts && e.is_retriable() => {
                    debug!("Invalidation attempt {} failed: {}", attempt, e);
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
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
    use std::sync::Arc;

    #[tokio::test]
    async fn test_timeout_success() {
        let result = with_timeout(Duration::from_secs(1), || async { Ok::<_, RosterError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_exceeded() {
        let result = with_timeout(Duration::from_millis(10), || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, RosterError>(42)
        })
        .await;

        assert!(matches!(result, Err(RosterError::Timeout(_))));
    }

    fn counting_failure(
        calls: Arc<AtomicU32>,
        succeed_on: u32,
        error: fn() -> RosterError,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = RosterResult<()>> + Send>> {
        move || {
            let calls = Arc::clone(&calls);
            Box::pin(async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= succeed_on {
                    Ok(())
                } else {
                    Err(error())
                }
            })
        }
    }

    #[tokio::test]
    async fn test_single_attempt_by_default() {
        let calls = Arc::new(AtomicU32::new(0));
        let result = InvalidationPolicy::default()
            .execute(counting_failure(Arc::clone(&calls), 2, || {
                RosterError::cache_unavailable("down")
            }))
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = InvalidationPolicy::new(3, Duration::from_millis(1));
        let result = policy
            .execute(counting_failure(Arc::clone(&calls), 3, || {
                RosterError::cache_unavailable("flaky")
            }))
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = InvalidationPolicy::new(5, Duration::from_millis(1));
        let result = policy
            .execute(counting_failure(Arc::clone(&calls), 10, || {
                RosterError::internal("bad")
            }))
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_zero_attempts_clamped() {
        assert_eq!(InvalidationPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
