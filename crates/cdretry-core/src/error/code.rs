//! Stable error codes carried by [`super::TypedError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error code space. Parsing is total: anything that is not one of the named
/// codes or `HTTP_<number>` lands in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// Connection could not be established or was dropped.
    Network,
    /// Request did not complete in time.
    Timeout,
    /// Request payload was rejected by validation.
    Validation,
    /// HTTP status reported by the server (`HTTP_<status>`).
    Http(u16),
    /// Any other code, kept verbatim.
    Other(String),
}

impl ErrorCode {
    pub const NETWORK_ERROR: &'static str = "NETWORK_ERROR";
    pub const TIMEOUT_ERROR: &'static str = "TIMEOUT_ERROR";
    pub const VALIDATION_ERROR: &'static str = "VALIDATION_ERROR";

    /// Parse a raw code string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            Self::NETWORK_ERROR => ErrorCode::Network,
            Self::TIMEOUT_ERROR => ErrorCode::Timeout,
            Self::VALIDATION_ERROR => ErrorCode::Validation,
            _ => match raw.strip_prefix("HTTP_") {
                // Canonical decimal only: "HTTP_0500" is not "HTTP_500".
                Some(digits)
                    if !digits.is_empty()
                        && digits.bytes().all(|b| b.is_ascii_digit())
                        && (digits == "0" || !digits.starts_with('0')) =>
                {
                    match digits.parse::<u16>() {
                        Ok(status) => ErrorCode::Http(status),
                        Err(_) => ErrorCode::Other(raw.to_string()),
                    }
                }
                _ => ErrorCode::Other(raw.to_string()),
            },
        }
    }

    /// True for codes the engine knows by name (everything but `Other`).
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ErrorCode::Other(_))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Network => f.write_str(Self::NETWORK_ERROR),
            ErrorCode::Timeout => f.write_str(Self::TIMEOUT_ERROR),
            ErrorCode::Validation => f.write_str(Self::VALIDATION_ERROR),
            ErrorCode::Http(status) => write!(f, "HTTP_{}", status),
            ErrorCode::Other(raw) => f.write_str(raw),
        }
    }
}

impl FromStr for ErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for ErrorCode {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for ErrorCode {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.to_string()
    }
}
