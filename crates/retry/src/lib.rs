//! Generic exponential-backoff retry for operations whose failures are
//! expected to be transient (RPC timeouts, connection resets).
//!
//! This has no opinion about which errors are worth retrying — that
//! classification belongs to the caller. Wrap only the sub-operation you
//! already know is retryable; wrapping a whole pipeline stage (including
//! its deterministic failure paths) defeats the point.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Runs `f`, retrying on failure up to `max_retries` times with delay
/// `base_delay * 2^attempt` between attempts. `max_retries = 0` disables
/// retries entirely (a single attempt, no delay). The last error is
/// re-raised if every attempt fails.
pub async fn with_retry<F, Fut, T, E>(mut f: F, max_retries: u32, base_delay: Duration) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < max_retries => {
                let delay = base_delay * 2u32.pow(attempt);
                tracing::warn!(attempt, ?delay, %error, "retrying after transient failure");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn succeeds_without_retry_on_first_try() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            },
            3,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success_within_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err("transient") } else { Ok(42) }
            },
            5,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn re_raises_last_error_when_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("still failing")
            },
            2,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Err("still failing"));
        assert_eq!(calls.load(Ordering::SeqCst), 3); // initial attempt + 2 retries
    }

    #[tokio::test]
    async fn zero_max_retries_disables_retrying() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, &str> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("fails once")
            },
            0,
            Duration::from_millis(1),
        )
        .await;
        assert_eq!(result, Err("fails once"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
