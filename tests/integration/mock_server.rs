//! Mock HTTP server setup for integration tests

use dashscope_image::{ImageApi, ImageApiBuilder};
use mockito::{Matcher, Mock, Server, ServerGuard};

pub const API_KEY: &str = "tok";

pub const PENDING_BODY: &str = r#"{
    "request_id": "4909100c-7b5a-9f92-bfe5-xxxxxx",
    "output": {"task_id": "t-1", "task_status": "PENDING"}
}"#;

pub const SUCCEEDED_BODY: &str = r#"{
    "request_id": "85eaba38-0185-99d7-8d16-xxxxxx",
    "output": {
        "task_id": "t-1",
        "task_status": "SUCCEEDED",
        "results": [{"url": "https://dashscope-result.oss-cn-beijing.aliyuncs.com/1.png"}],
        "task_metrics": {"TOTAL": 1, "SUCCEEDED": 1, "FAILED": 0}
    },
    "usage": {"image_count": 1}
}"#;

pub fn submit_path(segment: &str) -> String {
    format!("/api/v1/services/aigc/{}/image-synthesis", segment)
}

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server with the test API key.
    pub fn client(&self) -> ImageApi {
        self.client_with(|b| b)
    }

    pub fn client_with(&self, customize: impl FnOnce(ImageApiBuilder) -> ImageApiBuilder) -> ImageApi {
        let builder = ImageApi::builder()
            .api_key(API_KEY)
            .expect("api key")
            .base_url(self.base_url.as_str())
            .expect("base url");
        customize(builder).build().expect("Failed to build client")
    }

    /// Expect one asynchronous submission to the given endpoint segment.
    pub async fn mock_submit(&mut self, segment: &str, model: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("POST", submit_path(segment).as_str())
            .match_header("x-dashscope-async", "enable")
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({ "model": model })))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Expect one result lookup for `task_id`.
    pub async fn mock_task(&mut self, task_id: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", format!("/api/v1/tasks/{}", task_id).as_str())
            .match_header("authorization", format!("Bearer {}", API_KEY).as_str())
            .match_header("x-dashscope-async", Matcher::Missing)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Catch-all mocks that must never be hit.
    pub async fn mock_no_requests(&mut self) -> Vec<Mock> {
        let mut mocks = Vec::new();
        for method in ["GET", "POST"] {
            mocks.push(
                self.server
                    .mock(method, Matcher::Any)
                    .expect(0)
                    .create_async()
                    .await,
            );
        }
        mocks
    }
}
