//! Image synthesis client: task submission and task result lookup.

use super::routing::{RoutingClass, TASK_PATH};
use super::types::{ImageAsyncResponse, ImageRequest};
use crate::auth::{self, ApiKey, ENABLED, HEADER_ASYNC, HEADER_WORKSPACE};
use crate::models;
use crate::transport::{
    HttpTransport, HttpTransportBuilder, ResponseEntity, ResponseErrorHandler,
    RetryAwareErrorHandler, TransportRequest,
};
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderName, HeaderValue};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com";

/// Client for DashScope image synthesis.
///
/// Immutable once built and cheap to clone; all clones share one connection
/// pool. Use [`ImageApi::mutate`] to derive a differently configured client.
#[derive(Clone, Debug)]
pub struct ImageApi {
    base_url: String,
    api_key: ApiKey,
    workspace_id: Option<String>,
    transport: HttpTransport,
}

impl ImageApi {
    pub fn builder() -> ImageApiBuilder {
        ImageApiBuilder::new()
    }

    /// A builder pre-populated with this client's configuration.
    pub fn mutate(&self) -> ImageApiBuilder {
        ImageApiBuilder {
            base_url: self.base_url.clone(),
            api_key: Some(self.api_key.clone()),
            workspace_id: self.workspace_id.clone(),
            transport_builder: self.transport.mutate(),
            error_handler: self.transport.error_handler().clone(),
        }
    }

    /// Submit an asynchronous synthesis task.
    ///
    /// The endpoint is chosen from `request.model`; the response envelope is
    /// returned as received (after the error handler has seen it).
    pub async fn submit_image_gen_task(
        &self,
        request: ImageRequest,
    ) -> Result<ResponseEntity<ImageAsyncResponse>> {
        let class = RoutingClass::classify(&request.model);
        if class == RoutingClass::TextToImage && !models::is_known_model(&request.model) {
            debug!(model = %request.model, "unlisted model, routing to text2image");
        }

        let req = TransportRequest::post(class.submit_path())
            .header(
                HeaderName::from_static(HEADER_ASYNC),
                HeaderValue::from_static(ENABLED),
            )
            .json(&request)?;
        self.transport.exchange(req).await
    }

    /// Fetch the current state of a task.
    pub async fn get_image_gen_task_result(
        &self,
        task_id: &str,
    ) -> Result<ResponseEntity<ImageAsyncResponse>> {
        if task_id.trim().is_empty() {
            return Err(Error::invalid_argument_with_context(
                "Task ID must be specified",
                ErrorContext::new()
                    .with_field_path("task_id")
                    .with_source("image_api"),
            ));
        }
        let req = TransportRequest::get(TASK_PATH).path_param("task_id", task_id);
        self.transport.exchange(req).await
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn error_handler(&self) -> &Arc<dyn ResponseErrorHandler> {
        self.transport.error_handler()
    }
}

/// Builder for [`ImageApi`].
///
/// Required string values are checked when set; the API key is checked again
/// at [`build`](Self::build), before the transport is constructed.
#[derive(Clone, Debug)]
pub struct ImageApiBuilder {
    base_url: String,
    api_key: Option<ApiKey>,
    workspace_id: Option<String>,
    transport_builder: HttpTransportBuilder,
    error_handler: Arc<dyn ResponseErrorHandler>,
}

impl ImageApiBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            workspace_id: None,
            transport_builder: HttpTransportBuilder::new(),
            error_handler: Arc::new(RetryAwareErrorHandler),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(Error::invalid_argument_with_context(
                "Base URL cannot be empty",
                ErrorContext::new()
                    .with_field_path("builder.base_url")
                    .with_source("image_api_builder"),
            ));
        }
        self.base_url = base_url;
        Ok(self)
    }

    /// Optional. An empty value clears the workspace.
    pub fn workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        let workspace_id = workspace_id.into();
        self.workspace_id = if workspace_id.trim().is_empty() {
            None
        } else {
            Some(workspace_id)
        };
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::invalid_argument_with_context(
                "API key cannot be empty",
                ErrorContext::new()
                    .with_field_path("builder.api_key")
                    .with_source("image_api_builder"),
            ));
        }
        self.api_key = Some(ApiKey::new(api_key));
        Ok(self)
    }

    pub fn transport_builder(mut self, transport_builder: HttpTransportBuilder) -> Self {
        self.transport_builder = transport_builder;
        self
    }

    pub fn error_handler(mut self, error_handler: Arc<dyn ResponseErrorHandler>) -> Self {
        self.error_handler = error_handler;
        self
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get_workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    pub fn get_transport_builder(&self) -> &HttpTransportBuilder {
        &self.transport_builder
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn build(self) -> Result<ImageApi> {
        let api_key = self.api_key.ok_or_else(|| {
            Error::invalid_argument_with_context(
                "API key must be set",
                ErrorContext::new()
                    .with_field_path("builder.api_key")
                    .with_source("image_api_builder"),
            )
        })?;

        let headers = auth::json_content_headers(&api_key, self.workspace_id.as_deref())?;
        let transport = self
            .transport_builder
            .base_url(self.base_url.clone())
            .remove_default_header(HEADER_WORKSPACE)
            .default_headers(headers)
            .error_handler(self.error_handler)
            .build()?;

        Ok(ImageApi {
            base_url: self.base_url,
            api_key,
            workspace_id: self.workspace_id,
            transport,
        })
    }
}

impl Default for ImageApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
