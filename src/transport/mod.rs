//! HTTP transport: a reqwest connection pool bound to a base URL, with default
//! headers and a pluggable error-response interpreter.

pub mod error_handler;
pub mod http;
pub mod response;

pub use error_handler::{
    ErrorOutcome, ErrorResponse, FnErrorHandler, PassThroughErrorHandler, ResponseErrorHandler,
    RetryAwareErrorHandler,
};
pub use http::{HttpTransport, HttpTransportBuilder, TransportRequest};
pub use response::ResponseEntity;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URI template error: {0}")]
    UriTemplate(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}
