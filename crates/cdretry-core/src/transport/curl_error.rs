//! Map curl errors to typed error codes.

use crate::error::{ErrorCode, TypedError};

/// Code for transport failures that are neither timeouts nor connection loss.
/// Not a recognised code, so it classifies as unknown and is never retried.
pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";

/// Classify a curl error: timeouts → `TIMEOUT_ERROR`, connection-level
/// failures → `NETWORK_ERROR`, anything else → `TRANSPORT_ERROR`.
pub fn classify_curl_error(e: &curl::Error) -> TypedError {
    let code = if e.is_operation_timedout() {
        ErrorCode::Timeout
    } else if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        ErrorCode::Network
    } else {
        ErrorCode::parse(TRANSPORT_ERROR)
    };
    let mut err = TypedError::new(code, e.description()).with_detail("curl_code", e.code());
    if let Some(extra) = e.extra_description() {
        err = err.with_detail("curl_detail", extra);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{classify, ErrorClass};

    #[test]
    fn timeout_is_transient() {
        // CURLE_OPERATION_TIMEDOUT
        let e = classify_curl_error(&curl::Error::new(28));
        assert_eq!(e.code(), &ErrorCode::Timeout);
        assert_eq!(classify(&e), ErrorClass::Transient);
        assert_eq!(e.details()["curl_code"], 28);
    }

    #[test]
    fn connect_failures_are_network_errors() {
        // CURLE_COULDNT_RESOLVE_HOST, CURLE_COULDNT_CONNECT, CURLE_GOT_NOTHING
        for code in [6, 7, 52] {
            let e = classify_curl_error(&curl::Error::new(code));
            assert_eq!(e.code(), &ErrorCode::Network, "curl code {code}");
        }
    }

    #[test]
    fn other_curl_errors_fail_closed() {
        // CURLE_URL_MALFORMAT
        let e = classify_curl_error(&curl::Error::new(3));
        assert_eq!(e.code().to_string(), TRANSPORT_ERROR);
        assert_eq!(classify(&e), ErrorClass::Unknown);
    }
}
