//! Minimal HTTP transport for the API client.
//!
//! Uses the curl crate (libcurl) to perform GET requests and turns every
//! failure into a [`TypedError`] the retry engine can classify: curl errors
//! via [`classify_curl_error`], non-2xx responses via the API error envelope.

mod curl_error;

use std::str;
use std::time::Duration;

use crate::error::TypedError;

pub use curl_error::{classify_curl_error, TRANSPORT_ERROR};

/// Status and body of a successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Body as UTF-8 text, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs a GET request and returns the response if the status is 2xx.
///
/// Follows redirects. Runs in the current thread; use [`fetch`] from async code.
pub fn get(url: &str, timeout: Duration) -> Result<HttpResponse, TypedError> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| classify_curl_error(&e))?;
    easy.follow_location(true)
        .map_err(|e| classify_curl_error(&e))?;
    easy.connect_timeout(timeout.min(Duration::from_secs(15)))
        .map_err(|e| classify_curl_error(&e))?;
    easy.timeout(timeout).map_err(|e| classify_curl_error(&e))?;

    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(|e| classify_curl_error(&e))?;
        transfer.perform().map_err(|e| classify_curl_error(&e))?;
    }

    let code = easy.response_code().map_err(|e| classify_curl_error(&e))?;
    let status = u16::try_from(code).unwrap_or(0);
    if !(200..300).contains(&status) {
        let err = TypedError::from_envelope(status, &body).with_detail("url", url);
        tracing::debug!(url, status, code = %err.code(), "request failed");
        return Err(err);
    }

    Ok(HttpResponse { status, body })
}

/// Async wrapper around [`get`] that runs the transfer on the blocking pool.
pub async fn fetch(url: &str, timeout: Duration) -> Result<HttpResponse, TypedError> {
    let owned = url.to_string();
    match tokio::task::spawn_blocking(move || get(&owned, timeout)).await {
        Ok(result) => result,
        Err(join_err) => Err(TypedError::new(
            TRANSPORT_ERROR,
            format!("request task failed: {}", join_err),
        )
        .with_detail("url", url)),
    }
}
