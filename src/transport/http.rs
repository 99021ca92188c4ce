use super::error_handler::{
    ErrorOutcome, ErrorResponse, ResponseErrorHandler, RetryAwareErrorHandler,
};
use super::response::ResponseEntity;
use super::TransportError;
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Proxy};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 32;
const DEFAULT_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Mutable transport settings.
///
/// Cloning a builder copies every setting by value, so a builder obtained from
/// [`HttpTransport::mutate`] can be edited freely without touching the transport
/// it came from.
#[derive(Clone, Debug)]
pub struct HttpTransportBuilder {
    base_url: Option<String>,
    default_headers: HeaderMap,
    timeout: Duration,
    connect_timeout: Duration,
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Option<Duration>,
    proxy_url: Option<String>,
    error_handler: Arc<dyn ResponseErrorHandler>,
}

impl HttpTransportBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            pool_idle_timeout: Some(Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT_SECS)),
            proxy_url: None,
            error_handler: Arc::new(RetryAwareErrorHandler),
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Merge headers into the defaults, replacing existing values for the same names.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.default_headers.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn remove_default_header(mut self, name: &str) -> Self {
        self.default_headers.remove(name);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.pool_max_idle_per_host = n;
        self
    }

    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy_url = Some(url.into());
        self
    }

    pub fn error_handler(mut self, handler: Arc<dyn ResponseErrorHandler>) -> Self {
        self.error_handler = handler;
        self
    }

    pub fn get_base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn get_default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get_error_handler(&self) -> &Arc<dyn ResponseErrorHandler> {
        &self.error_handler
    }

    /// Build the connection pool. Parses the base URL; performs no network I/O.
    pub fn build(self) -> Result<HttpTransport> {
        let raw = self.base_url.as_deref().ok_or_else(|| {
            Error::invalid_argument_with_context(
                "Base URL must be set",
                ErrorContext::new()
                    .with_field_path("transport.base_url")
                    .with_source("http_transport_builder"),
            )
        })?;
        let base_url = Url::parse(raw).map_err(|e| {
            Error::invalid_argument_with_context(
                format!("Invalid base URL '{}': {}", raw, e),
                ErrorContext::new()
                    .with_field_path("transport.base_url")
                    .with_source("http_transport_builder"),
            )
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::invalid_argument_with_context(
                format!("Base URL '{}' must be an http(s) URL", raw),
                ErrorContext::new()
                    .with_field_path("transport.base_url")
                    .with_source("http_transport_builder"),
            ));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .default_headers(self.default_headers.clone());

        if let Some(proxy_url) = &self.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::invalid_argument_with_context(
                    format!("Invalid proxy URL '{}': {}", proxy_url, e),
                    ErrorContext::new()
                        .with_field_path("transport.proxy")
                        .with_source("http_transport_builder"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(TransportError::Http)?;

        Ok(HttpTransport {
            client,
            base_url,
            error_handler: self.error_handler.clone(),
            settings: self,
        })
    }
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A single request against a URI template such as `/api/v1/tasks/{task_id}`.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    method: Method,
    uri_template: String,
    path_params: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
}

impl TransportRequest {
    pub fn new(method: Method, uri_template: impl Into<String>) -> Self {
        Self {
            method,
            uri_template: uri_template.into(),
            path_params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(uri_template: impl Into<String>) -> Self {
        Self::new(Method::GET, uri_template)
    }

    pub fn post(uri_template: impl Into<String>) -> Self {
        Self::new(Method::POST, uri_template)
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri_template(&self) -> &str {
        &self.uri_template
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// Immutable HTTP handle. Cloning shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    error_handler: Arc<dyn ResponseErrorHandler>,
    settings: HttpTransportBuilder,
}

impl HttpTransport {
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// A builder holding a copy of this transport's settings.
    pub fn mutate(&self) -> HttpTransportBuilder {
        self.settings.clone()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.settings.default_headers
    }

    pub fn error_handler(&self) -> &Arc<dyn ResponseErrorHandler> {
        &self.error_handler
    }

    /// Expand a URI template against the base URL.
    ///
    /// Each `{name}` segment is replaced by its value, percent-encoded as a single
    /// path segment. Any path on the base URL is kept as a prefix.
    pub fn resolve_url(&self, uri_template: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                TransportError::UriTemplate(format!("base URL '{}' cannot be a base", self.base_url))
            })?;
            segments.pop_if_empty();
            for raw in uri_template.trim_start_matches('/').split('/') {
                let segment = match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => params
                        .iter()
                        .find(|(k, _)| k == name)
                        .map(|(_, v)| v.as_str())
                        .ok_or_else(|| {
                            TransportError::UriTemplate(format!(
                                "no value for path variable '{}' in '{}'",
                                name, uri_template
                            ))
                        })?,
                    None => raw,
                };
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Send the request and deserialize the body into `T`.
    ///
    /// Statuses flagged by the error handler are handed to it first; its outcome
    /// is applied as-is.
    pub async fn exchange<T: DeserializeOwned>(
        &self,
        request: TransportRequest,
    ) -> Result<ResponseEntity<T>> {
        let url = self.resolve_url(&request.uri_template, &request.path_params)?;
        debug!(method = %request.method, url = %url, "dispatching request");

        let mut req = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(request.headers);
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(TransportError::Http)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(TransportError::Http)?;
        debug!(http_status = status.as_u16(), bytes = body.len(), "received response");

        if self.error_handler.has_error(status) {
            let failure = ErrorResponse {
                method: request.method,
                url,
                status,
                headers: headers.clone(),
                body: body.clone(),
            };
            match self.error_handler.handle_error(&failure) {
                ErrorOutcome::Propagate(err) => return Err(err),
                ErrorOutcome::Recover(value) => {
                    let recovered = serde_json::from_value(value)?;
                    return Ok(ResponseEntity::new(status, headers, Some(recovered)));
                }
                ErrorOutcome::PassThrough => {}
            }
        }

        let parsed = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(&body)?)
        };
        Ok(ResponseEntity::new(status, headers, parsed))
    }
}
