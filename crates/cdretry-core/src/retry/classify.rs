//! Classify error codes into retry classes.

use crate::error::{ErrorCode, TypedError};

/// Retry class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Network loss, timeout or server-side 5xx; safe to retry.
    Transient,
    /// Bad request, auth, not-found or validation; retrying cannot help.
    Client,
    /// Anything unrecognised. Never retried.
    Unknown,
}

impl ErrorClass {
    pub fn is_retryable(self) -> bool {
        self == ErrorClass::Transient
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorClass::Transient => "transient",
            ErrorClass::Client => "client",
            ErrorClass::Unknown => "unknown",
        }
    }
}

/// Classify a parsed error code.
pub fn classify_code(code: &ErrorCode) -> ErrorClass {
    match code {
        ErrorCode::Network | ErrorCode::Timeout => ErrorClass::Transient,
        ErrorCode::Http(500 | 502 | 503) => ErrorClass::Transient,
        ErrorCode::Validation => ErrorClass::Client,
        ErrorCode::Http(400 | 401 | 403 | 404) => ErrorClass::Client,
        ErrorCode::Http(_) | ErrorCode::Other(_) => ErrorClass::Unknown,
    }
}

/// Classify a raw code string (empty or unparsable codes are `Unknown`).
pub fn classify_str(raw: &str) -> ErrorClass {
    classify_code(&ErrorCode::parse(raw))
}

/// Classify a typed error by its code.
pub fn classify(error: &TypedError) -> ErrorClass {
    classify_code(error.code())
}

/// True iff the error belongs to the transient-network class.
pub fn is_network_error(error: &TypedError) -> bool {
    classify(error) == ErrorClass::Transient
}
