//! Retry and backoff.
//!
//! This module encapsulates error classification (transient network failures,
//! client errors, unknown codes), the exponential backoff policy with jitter,
//! and the async retry loop that every outbound call goes through, so callers
//! share one consistent policy.

mod classify;
mod error;
mod jitter;
mod observer;
mod policy;
mod run;

pub use classify::{classify, classify_code, classify_str, is_network_error, ErrorClass};
pub use error::{PolicyError, RetryError};
pub use jitter::{FixedJitter, JitterSource, RandJitter};
pub use observer::{
    NoopObserver, RetryContext, RetryObserver, RetryState, TracingObserver, DEFAULT_LABEL,
};
pub use policy::{
    get_retry_delay, should_retry, RetryDecision, RetryPolicy, BASE_DELAY, JITTER_RATIO,
    MAX_JITTER_RATIO, MAX_RETRIES,
};
pub use run::{with_retry, with_retry_labeled, Retrier};
