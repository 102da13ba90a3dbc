//! Retry loop: run an async operation until success or the attempt budget is spent.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use super::policy::{RetryPolicy, RetryState};

/// Runs `op` until it succeeds or `policy` runs out of attempts, sleeping on
/// the tokio timer between attempts.
///
/// Every failure is retried regardless of cause. The last error is returned
/// unchanged. There is no cancellation: once started, the call runs to success
/// or exhaustion, and a caller that went away simply drops the result.
pub async fn run_with_retry<T, E, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    run_with_retry_using(policy, tokio::time::sleep, op).await
}

/// Same as [`run_with_retry`] with an injected sleep, so tests can observe delays
/// without waiting on the clock.
pub async fn run_with_retry_using<T, E, F, Fut, S, SFut>(
    policy: &RetryPolicy,
    mut sleep: S,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut attempt = 1u32;
    let mut delay = policy.base_delay;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => match RetryState::Attempting(attempt).next(policy, false) {
                RetryState::Attempting(next) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "operation failed, retrying after backoff"
                    );
                    sleep(delay).await;
                    delay = delay.saturating_mul(2);
                    attempt = next;
                }
                _ => {
                    tracing::warn!(
                        attempts = attempt,
                        error = %err,
                        "operation failed, retries exhausted"
                    );
                    return Err(err);
                }
            },
        }
    }
}
