//! Retry loop: run an async operation until success or the policy says stop.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::TypedError;

use super::classify::classify;
use super::error::RetryError;
use super::jitter::{JitterSource, RandJitter};
use super::observer::{RetryContext, RetryObserver, RetryState, TracingObserver, DEFAULT_LABEL};
use super::policy::{RetryDecision, RetryPolicy};

/// Drives an operation through up to `policy.max_attempts()` attempts.
///
/// A `Retrier` is cheap to clone and may be shared by concurrent runs: each
/// [`Retrier::run`] owns its own [`RetryContext`], and the only shared pieces are
/// the immutable policy, the jitter source and the observer.
#[derive(Clone)]
pub struct Retrier {
    policy: RetryPolicy,
    jitter: Arc<Mutex<Box<dyn JitterSource + Send>>>,
    observer: Arc<dyn RetryObserver>,
}

impl std::fmt::Debug for Retrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for Retrier {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl Retrier {
    pub fn new(policy: RetryPolicy) -> Self {
        let jitter: Box<dyn JitterSource + Send> = Box::new(RandJitter::from_entropy());
        Self {
            policy,
            jitter: Arc::new(Mutex::new(jitter)),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the jitter source (e.g. a seeded or fixed one in tests).
    pub fn with_jitter(mut self, jitter: impl JitterSource + Send + 'static) -> Self {
        let jitter: Box<dyn JitterSource + Send> = Box::new(jitter);
        self.jitter = Arc::new(Mutex::new(jitter));
        self
    }

    /// Replace the observer notified about failed attempts and state changes.
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error, runs
    /// out of attempts, or `cancel` fires while waiting between attempts.
    ///
    /// On failure the error of the last attempt is returned unchanged. The only
    /// suspension besides the operation itself is the backoff wait; the retry
    /// decision is always made before it starts.
    pub async fn run<T, E, F, Fut>(
        &self,
        label: Option<&str>,
        cancel: Option<&CancellationToken>,
        mut operation: F,
    ) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<TypedError>,
    {
        let mut ctx = RetryContext::new(
            label.unwrap_or(DEFAULT_LABEL),
            self.policy.max_attempts(),
        );

        loop {
            self.observer.on_state(&ctx, RetryState::Attempting);
            let error: TypedError = match operation().await {
                Ok(value) => {
                    self.observer.on_state(&ctx, RetryState::Done);
                    return Ok(value);
                }
                Err(e) => e.into(),
            };

            let class = classify(&error);
            let delay = match self.next_delay(&ctx, &error) {
                Some(delay) => delay,
                None => {
                    self.observer.on_give_up(&ctx, &error, class);
                    self.observer.on_state(&ctx, RetryState::Failed);
                    return Err(RetryError::Failed(error));
                }
            };

            self.observer.on_retry(&ctx, &error, class, delay);
            self.observer.on_state(&ctx, RetryState::Waiting);
            if !backoff(delay, cancel).await {
                self.observer.on_state(&ctx, RetryState::Cancelled);
                return Err(RetryError::Cancelled {
                    label: ctx.label().to_string(),
                    attempt: ctx.attempt(),
                });
            }
            ctx.advance();
        }
    }

    /// Synchronous retry decision for the attempt that just failed.
    fn next_delay(&self, ctx: &RetryContext, error: &TypedError) -> Option<Duration> {
        let mut jitter = self.jitter.lock().unwrap_or_else(PoisonError::into_inner);
        match self.policy.decide(error, ctx.attempt(), &mut **jitter) {
            Ok(RetryDecision::RetryAfter(delay)) => Some(delay),
            Ok(RetryDecision::NoRetry) => None,
            Err(e) => {
                tracing::warn!(
                    label = ctx.label(),
                    attempt = ctx.attempt(),
                    "retry policy: {}",
                    e
                );
                None
            }
        }
    }
}

/// Sleep for `delay`. Returns false if `cancel` fired first (or already had).
async fn backoff(delay: Duration, cancel: Option<&CancellationToken>) -> bool {
    match cancel {
        None => {
            tokio::time::sleep(delay).await;
            true
        }
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(delay) => true,
            }
        }
    }
}

/// Run `operation` under the default policy, with no cancellation.
pub async fn with_retry<T, E, F, Fut>(operation: F) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<TypedError>,
{
    Retrier::default().run(None, None, operation).await
}

/// [`with_retry`] with a label for logs and cancellation reports.
pub async fn with_retry_labeled<T, E, F, Fut>(label: &str, operation: F) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<TypedError>,
{
    Retrier::default().run(Some(label), None, operation).await
}
