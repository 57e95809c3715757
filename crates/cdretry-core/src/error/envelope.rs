//! Decoding of the API's JSON error body:
//!
//! ```json
//! {"error": {"code": "VALIDATION_ERROR", "message": "...", "details": [...],
//!            "correlation_id": "...", "timestamp": "...", "path": "/api/cards", "method": "POST"}}
//! ```

use serde::Deserialize;
use serde_json::Value;

use super::{ErrorCode, TypedError};

#[derive(Debug, Deserialize)]
struct Envelope {
    error: EnvelopeBody,
}

#[derive(Debug, Deserialize)]
struct EnvelopeBody {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    details: Option<Value>,
    correlation_id: Option<String>,
    timestamp: Option<String>,
    path: Option<String>,
    method: Option<String>,
}

impl TypedError {
    /// Build an error from a non-2xx response status and body.
    ///
    /// A recognised envelope code wins; otherwise the code is `HTTP_<status>` and
    /// the server's own code is kept in `details.server_code`. Bodies that do not
    /// decode fall back to [`TypedError::from_status`].
    pub fn from_envelope(status: u16, body: &[u8]) -> Self {
        let body = match serde_json::from_slice::<Envelope>(body) {
            Ok(envelope) => envelope.error,
            Err(_) => return Self::from_status(status),
        };

        let server_code = body.code.as_deref().map(ErrorCode::parse);
        let code = match &server_code {
            Some(c) if c.is_recognized() => c.clone(),
            _ => ErrorCode::Http(status),
        };
        let message = body
            .message
            .unwrap_or_else(|| format!("HTTP {}", status));

        // Server-supplied details first, so our own keys below always win.
        let mut err = TypedError::new(code, message);
        match body.details {
            Some(Value::Object(map)) => err = err.with_details(map),
            Some(Value::Null) | None => {}
            Some(other) => err = err.with_detail("errors", other),
        }
        err = err.with_detail("status", status);
        if let Some(ErrorCode::Other(raw)) = server_code {
            err = err.with_detail("server_code", raw);
        }
        let extras = [
            ("correlation_id", body.correlation_id),
            ("server_timestamp", body.timestamp),
            ("path", body.path),
            ("method", body.method),
        ];
        for (key, value) in extras {
            if let Some(v) = value {
                err = err.with_detail(key, v);
            }
        }
        err
    }
}
