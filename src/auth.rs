//! Credentials and the default headers sent with every DashScope request.

use crate::transport::TransportError;
use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use std::fmt;

/// Workspace selector for RAM sub-accounts and dedicated workspaces.
pub const HEADER_WORKSPACE: &str = "x-dashscope-workspace";
/// Asks the service to queue the task and return immediately.
pub const HEADER_ASYNC: &str = "x-dashscope-async";
pub const ENABLED: &str = "enable";

/// An API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn user_agent() -> String {
    format!("dashscope-image-rs/{}", env!("CARGO_PKG_VERSION"))
}

/// Default JSON headers: bearer credential, content type, user agent and, when a
/// workspace is given, the workspace header.
pub fn json_content_headers(api_key: &ApiKey, workspace_id: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.value()))
        .map_err(|_| TransportError::InvalidHeader("API key contains invalid characters".into()))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let agent = HeaderValue::from_str(&user_agent())
        .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
    headers.insert(USER_AGENT, agent);

    if let Some(ws) = workspace_id.filter(|w| !w.trim().is_empty()) {
        let value = HeaderValue::from_str(ws).map_err(|_| {
            TransportError::InvalidHeader(format!("workspace id '{}' is not a valid header value", ws))
        })?;
        headers.insert(HeaderName::from_static(HEADER_WORKSPACE), value);
    }

    Ok(headers)
}
