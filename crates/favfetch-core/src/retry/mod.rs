//! Retry and backoff policy.
//!
//! Classifies fetch failures (timeouts, throttling, connection failures) and
//! decides on exponential backoff so every download path shares one policy.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
