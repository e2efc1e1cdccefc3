use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::error::ToolError;

/// Run `attempt` up to `max_retries` times with exponential backoff.
///
/// Attempts are 1-indexed. Success returns immediately; a failure on
/// attempt k < max_retries sleeps `base_delay * 2^(k-1)` and retries; a
/// failure on the final attempt propagates the last error unchanged.
/// `max_retries` of 0 or 1 short-circuits to a single attempt with no
/// delay. Every failure kind is retried; callers are expected to route
/// only idempotent reads through this executor.
pub async fn with_retry<T, F, Fut>(
    max_retries: u32,
    base_delay: Duration,
    mut attempt: F,
) -> Result<T, ToolError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ToolError>>,
{
    let attempts = max_retries.max(1);
    let mut attempt_no: u32 = 1;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt_no < attempts => {
                let delay = base_delay * 2u32.pow(attempt_no - 1);
                debug!(
                    "attempt {}/{} failed ({}); retrying in {:?}",
                    attempt_no, attempts, e, delay
                );
                tokio::time::sleep(delay).await;
                attempt_no += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_and_propagates_last_error() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();
        let result: Result<(), ToolError> =
            with_retry(3, Duration::from_millis(100), || {
                calls.set(calls.get() + 1);
                async { Err(ToolError::unknown("always fails")) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
        // Backoff waits: 100ms after attempt 1, 200ms after attempt 2.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn success_short_circuits_after_one_failure() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();
        let result = with_retry(3, Duration::from_millis(100), || {
            let n = calls.get() + 1;
            calls.set(n);
            async move {
                if n < 2 {
                    Err(ToolError::unknown("transient"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.get(), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_and_one_retries_mean_single_attempt() {
        for max in [0u32, 1] {
            let calls = Cell::new(0u32);
            let start = tokio::time::Instant::now();
            let result: Result<(), ToolError> =
                with_retry(max, Duration::from_millis(100), || {
                    calls.set(calls.get() + 1);
                    async { Err(ToolError::unknown("fails")) }
                })
                .await;
            assert!(result.is_err());
            assert_eq!(calls.get(), 1);
            assert_eq!(start.elapsed(), Duration::ZERO);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_never_sleeps() {
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();
        let result = with_retry(5, Duration::from_millis(500), || {
            calls.set(calls.get() + 1);
            async { Ok(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
