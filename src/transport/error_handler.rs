//! Error-response interpreters.
//!
//! The transport hands every response whose status the handler flags (by default
//! 4xx and 5xx) to [`ResponseErrorHandler::handle_error`] before the body is
//! deserialized. The handler decides the outcome: raise an error, substitute a
//! recovered body, or let the original body through.

use crate::error_code::ErrorClass;
use crate::Error;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// A response the error handler was asked to interpret.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub method: Method,
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ErrorResponse {
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn retry_after_ms(&self) -> Option<u32> {
        let raw = self.headers.get("retry-after")?.to_str().ok()?;
        let secs: u32 = raw.trim().parse().ok()?;
        Some(secs.saturating_mul(1000))
    }
}

/// What the transport should do with a flagged response.
#[derive(Debug)]
pub enum ErrorOutcome {
    /// Return this error to the caller.
    Propagate(Error),
    /// Deserialize this value instead of the response body.
    Recover(serde_json::Value),
    /// Deserialize the original body as if the status were a success.
    PassThrough,
}

pub trait ResponseErrorHandler: Send + Sync + fmt::Debug {
    fn has_error(&self, status: StatusCode) -> bool {
        status.is_client_error() || status.is_server_error()
    }

    fn handle_error(&self, response: &ErrorResponse) -> ErrorOutcome;
}

/// DashScope error body: `{"code": "...", "message": "...", "request_id": "..."}`.
#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
}

/// Default handler. Raises [`Error::Remote`] classified as transient (rate limits,
/// 5xx, timeouts) or permanent, so callers can drive their own retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryAwareErrorHandler;

impl ResponseErrorHandler for RetryAwareErrorHandler {
    fn handle_error(&self, response: &ErrorResponse) -> ErrorOutcome {
        let parsed: ServiceErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
        let status = response.status.as_u16();
        let class = ErrorClass::classify(status, parsed.code.as_deref());

        let message = parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                let text = response.body_text();
                if text.trim().is_empty() {
                    response
                        .status
                        .canonical_reason()
                        .unwrap_or("unknown status")
                        .to_string()
                } else {
                    text.into_owned()
                }
            });

        ErrorOutcome::Propagate(Error::Remote {
            status,
            code: parsed.code,
            class: class.name().to_string(),
            message,
            request_id: parsed.request_id,
            retryable: class.retryable(),
            retry_after_ms: response.retry_after_ms(),
        })
    }
}

/// Never raises; error bodies are deserialized like successful ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughErrorHandler;

impl ResponseErrorHandler for PassThroughErrorHandler {
    fn has_error(&self, _status: StatusCode) -> bool {
        false
    }

    fn handle_error(&self, _response: &ErrorResponse) -> ErrorOutcome {
        ErrorOutcome::PassThrough
    }
}

/// Adapts a closure into a handler.
pub struct FnErrorHandler<F> {
    f: F,
}

impl<F> FnErrorHandler<F>
where
    F: Fn(&ErrorResponse) -> ErrorOutcome + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for FnErrorHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnErrorHandler").finish_non_exhaustive()
    }
}

impl<F> ResponseErrorHandler for FnErrorHandler<F>
where
    F: Fn(&ErrorResponse) -> ErrorOutcome + Send + Sync,
{
    fn handle_error(&self, response: &ErrorResponse) -> ErrorOutcome {
        (self.f)(response)
    }
}
