//! Per-run context and the observer hook for intermediate failures.

use std::time::Duration;

use crate::error::TypedError;

use super::classify::ErrorClass;

/// Label used when the caller does not name the operation.
pub const DEFAULT_LABEL: &str = "operation";

/// State of one retry run. `Done`, `Failed` and `Cancelled` are terminal;
/// `Waiting` is the only state in which the run is suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting,
    Waiting,
    Done,
    Failed,
    Cancelled,
}

impl RetryState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RetryState::Done | RetryState::Failed | RetryState::Cancelled
        )
    }
}

/// Bookkeeping for a single [`super::Retrier::run`] call. Never shared between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryContext {
    attempt: u32,
    max_attempts: u32,
    label: String,
}

impl RetryContext {
    pub(crate) fn new(label: &str, max_attempts: u32) -> Self {
        Self {
            attempt: 1,
            max_attempts,
            label: label.to_string(),
        }
    }

    pub(crate) fn advance(&mut self) {
        self.attempt += 1;
    }

    /// Current attempt, starting at 1.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Hook for logging or telemetry of a retry run. All methods default to no-ops.
pub trait RetryObserver: Send + Sync {
    /// Attempt `ctx.attempt()` failed with a retryable error; waiting `delay` next.
    fn on_retry(
        &self,
        _ctx: &RetryContext,
        _error: &TypedError,
        _class: ErrorClass,
        _delay: Duration,
    ) {
    }

    /// Attempt `ctx.attempt()` failed and the error is being returned to the caller.
    fn on_give_up(&self, _ctx: &RetryContext, _error: &TypedError, _class: ErrorClass) {}

    /// The run entered `state`.
    fn on_state(&self, _ctx: &RetryContext, _state: RetryState) {}
}

/// Default observer: structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn on_retry(
        &self,
        ctx: &RetryContext,
        error: &TypedError,
        class: ErrorClass,
        delay: Duration,
    ) {
        tracing::warn!(
            label = ctx.label(),
            attempt = ctx.attempt(),
            max_attempts = ctx.max_attempts(),
            code = %error.code(),
            class = class.as_str(),
            delay_ms = delay.as_millis() as u64,
            "attempt failed, retrying: {}",
            error.message()
        );
    }

    fn on_give_up(&self, ctx: &RetryContext, error: &TypedError, class: ErrorClass) {
        if class.is_retryable() {
            tracing::warn!(
                label = ctx.label(),
                attempt = ctx.attempt(),
                code = %error.code(),
                "retries exhausted: {}",
                error.message()
            );
        } else {
            tracing::debug!(
                label = ctx.label(),
                attempt = ctx.attempt(),
                code = %error.code(),
                class = class.as_str(),
                "not retryable: {}",
                error.message()
            );
        }
    }

    fn on_state(&self, ctx: &RetryContext, state: RetryState) {
        tracing::trace!(label = ctx.label(), attempt = ctx.attempt(), ?state, "retry state");
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {}
