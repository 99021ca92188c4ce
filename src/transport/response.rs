use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Full HTTP response: status, headers and the deserialized body.
///
/// `body` is `None` when the service answered with an empty payload.
#[derive(Debug, Clone)]
pub struct ResponseEntity<T> {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<T>,
}

impl<T> ResponseEntity<T> {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Option<T>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
