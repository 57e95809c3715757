//! Errors produced by the retry engine itself.

use thiserror::Error;

use crate::error::TypedError;

/// Misuse of the policy functions, or a policy that cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyError {
    /// Attempts are 1-based; 0 is a caller bug.
    #[error("invalid argument: attempt must be >= 1 (got {0})")]
    InvalidAttempt(u32),
    /// `base * 2^(attempt-1)` does not fit in a `Duration`.
    #[error("backoff delay for attempt {0} overflows")]
    DelayOverflow(u32),
    #[error("invalid retry policy: {0}")]
    InvalidConfig(String),
}

/// Terminal outcome of a retry run that did not succeed.
#[derive(Debug, Error)]
pub enum RetryError {
    /// The last attempt's error, exactly as the operation produced it.
    #[error(transparent)]
    Failed(#[from] TypedError),
    /// The cancellation token fired while waiting to retry.
    #[error("{label}: cancelled while waiting to retry (after attempt {attempt})")]
    Cancelled { label: String, attempt: u32 },
}

impl RetryError {
    /// Code used by [`RetryError::into_typed`] for cancellations.
    pub const CANCELLED: &'static str = "CANCELLED";

    /// The operation's error, if the run failed rather than being cancelled.
    pub fn typed(&self) -> Option<&TypedError> {
        match self {
            RetryError::Failed(e) => Some(e),
            RetryError::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }

    /// Collapse into a single error shape. Cancellation becomes a `CANCELLED`
    /// error, which classifies as unknown and is therefore never retried.
    pub fn into_typed(self) -> TypedError {
        match self {
            RetryError::Failed(e) => e,
            RetryError::Cancelled { label, attempt } => {
                let message = format!("{}: cancelled while waiting to retry", label);
                TypedError::new(Self::CANCELLED, message)
                    .with_detail("label", label)
                    .with_detail("attempt", attempt)
            }
        }
    }
}
