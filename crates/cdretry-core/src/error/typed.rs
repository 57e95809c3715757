use std::io;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::ErrorCode;

/// Immutable failure record: code, message, structured details and creation time.
///
/// Fields are only reachable through getters; the `with_*` builders consume the
/// value and are meant for construction, before the error is handed to anyone.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct TypedError {
    code: ErrorCode,
    message: String,
    #[serde(default)]
    details: Map<String, Value>,
    timestamp: DateTime<Utc>,
}

impl TypedError {
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Map::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Error for a non-2xx response when nothing better than the status is known.
    pub fn from_status(status: u16) -> Self {
        Self::new(ErrorCode::Http(status), format!("HTTP {}", status))
            .with_detail("status", status)
    }

    /// Attach one detail entry (replaces an existing key).
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Merge a details map; entries already present are overwritten.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details.extend(details);
        self
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// IO failures from socket-level operations: timeouts and connection loss
/// become transient codes, everything else is `IO_ERROR`.
impl From<io::Error> for TypedError {
    fn from(e: io::Error) -> Self {
        let code = match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorCode::Timeout,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::AddrNotAvailable
            | io::ErrorKind::UnexpectedEof => ErrorCode::Network,
            _ => ErrorCode::Other("IO_ERROR".to_string()),
        };
        Self::new(code, e.to_string()).with_detail("io_kind", format!("{:?}", e.kind()))
    }
}

/// A per-attempt deadline set by the caller (`tokio::time::timeout`) expired.
impl From<tokio::time::error::Elapsed> for TypedError {
    fn from(e: tokio::time::error::Elapsed) -> Self {
        Self::timeout(e.to_string())
    }
}
