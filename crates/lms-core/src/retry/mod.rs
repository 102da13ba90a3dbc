//! Retry and backoff for unreliable API endpoints.
//!
//! The retry loop itself is cause-agnostic: any failure is retried until the
//! attempt budget runs out. Classification into [`ErrorKind`] exists so callers
//! can log and present failures (server fault vs. no connection) distinctly.

mod classify;
mod policy;
mod run;

pub use classify::{classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryPolicy, RetryState, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES};
pub use run::{run_with_retry, run_with_retry_using};
