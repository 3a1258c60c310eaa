//! Retry with exponential backoff for transient Apify failures.
//!
//! Non-retriable errors (missing actor, parse failures, non-429 statuses)
//! are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::ScraperError;

/// Returns `true` if `err` represents a transient condition worth retrying.
///
/// Retriable: [`ScraperError::RateLimited`] (HTTP 429) and
/// [`ScraperError::Http`] (network-level failure). Everything else is
/// returned immediately — retrying a 404 or a parse failure cannot succeed.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Executes `operation`, retrying transient errors with exponential backoff.
///
/// The wait before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds
/// plus up to one second of jitter, so concurrent keyword fetches that hit a
/// rate limit together don't retry in lockstep. With `max_retries = 2` the
/// operation is attempted at most 3 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }

                let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
                let jitter_ms = if delay_secs == 0 {
                    0
                } else {
                    rand::rng().random_range(0..1000)
                };
                tracing::warn!(
                    attempt,
                    delay_secs,
                    error = %err,
                    "transient scrape failure, backing off"
                );
                tokio::time::sleep(
                    Duration::from_secs(delay_secs) + Duration::from_millis(jitter_ms),
                )
                .await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn returns_first_success_without_retrying() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(3, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ScraperError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limited_until_budget_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(2, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ScraperError::RateLimited {
                    actor: "test~actor".into(),
                    retry_after_secs: 0,
                })
            }
        })
        .await;
        assert!(matches!(result, Err(ScraperError::RateLimited { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "initial try + 2 retries");
    }

    #[tokio::test]
    async fn does_not_retry_unexpected_status() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(3, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ScraperError::UnexpectedStatus {
                    status: 403,
                    actor: "test~actor".into(),
                })
            }
        })
        .await;
        assert!(matches!(result, Err(ScraperError::UnexpectedStatus { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
