//! Retry utilities for flaky browser interactions.
//!
//! Provides exponential backoff retry logic for transient navigation and
//! protocol errors. Non-retriable errors (missing search entry points, search
//! timeouts, region failures) are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use crate::error::ScrapeError;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScrapeError::Navigation`] — page load flaked; storefronts routinely
///   recover on a second attempt.
/// - [`ScrapeError::Browser`] — DevTools protocol hiccup (dropped websocket
///   frame, late target attach).
///
/// Non-retriable errors (propagated immediately):
/// - [`ScrapeError::Init`] / [`ScrapeError::NoBrowserBinary`] — fatal; the
///   session itself is unusable.
/// - [`ScrapeError::MissingSearchEntry`] — the page markup has no search
///   affordance we recognize; reloading returns the same markup.
/// - [`ScrapeError::SearchTimeout`] — we already waited the full capture
///   window once.
/// - [`ScrapeError::Location`] / [`ScrapeError::Interceptor`] — handled by the
///   caller's task bookkeeping, not by blind repetition.
fn is_retriable(err: &ScrapeError) -> bool {
    matches!(
        err,
        ScrapeError::Navigation { .. } | ScrapeError::Browser(_)
    )
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On success the result is returned immediately.
///
/// On a retriable error ([`ScrapeError::Navigation`] or [`ScrapeError::Browser`]),
/// the function sleeps for `backoff_base_secs * 2^attempt` seconds and tries again,
/// up to `max_retries` additional attempts after the first try. If all retries are
/// exhausted the last error is returned.
///
/// Non-retriable errors are returned immediately without sleeping or retrying.
///
/// # Backoff schedule (example with `backoff_base_secs = 1`)
///
/// | Attempt | Sleep before next attempt |
/// |---------|--------------------------|
/// | 0 (initial) | — (no sleep before first try) |
/// | 1 (first retry) | 1 × 2^0 = 1 s |
/// | 2 (second retry) | 1 × 2^1 = 2 s |
///
/// With `max_retries = 2` the operation is attempted at most 3 times total.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScrapeError>>,
{
    let mut last_err;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                last_err = err;
            }
        }

        // Exponential backoff: base * 2^attempt seconds.
        // Cap at u64::MAX to prevent overflow on extreme configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %last_err,
            "transient browser error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
