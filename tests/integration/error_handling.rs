//! Non-success responses: default classification, custom handlers, transport failures.

use crate::integration::mock_server::{submit_path, MockServerFixture};
use dashscope_image::transport::{ErrorResponse, FnErrorHandler, PassThroughErrorHandler};
use dashscope_image::{Error, ErrorOutcome, ImageApi, ImageRequest, TaskStatus};
use std::sync::Arc;

#[tokio::test]
async fn throttling_surfaces_as_retryable_remote_error() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", submit_path("text2image").as_str())
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_header("retry-after", "2")
        .with_body(r#"{"code":"Throttling.RateQuota","message":"Requests rate limit exceeded, please try again later.","request_id":"r-429"}"#)
        .create_async()
        .await;

    let err = fixture
        .client()
        .submit_image_gen_task(ImageRequest::new("qwen-image", "p"))
        .await
        .unwrap_err();
    mock.assert_async().await;

    assert!(err.is_retryable());
    match err {
        Error::Remote {
            status,
            code,
            class,
            request_id,
            retry_after_ms,
            ..
        } => {
            assert_eq!(status, 429);
            assert_eq!(code.as_deref(), Some("Throttling.RateQuota"));
            assert_eq!(class, "rate_limited");
            assert_eq!(request_id.as_deref(), Some("r-429"));
            assert_eq!(retry_after_ms, Some(2000));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn invalid_api_key_is_not_retryable() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_task(
            "t-1",
            401,
            r#"{"code":"InvalidApiKey","message":"Invalid API-key provided.","request_id":"r-401"}"#,
        )
        .await;

    let err = fixture
        .client()
        .get_image_gen_task_result("t-1")
        .await
        .unwrap_err();
    mock.assert_async().await;

    assert_eq!(err.status(), Some(401));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn custom_handler_can_recover_a_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_task("t-gone", 404, r#"{"code":"NotFound","message":"task not found"}"#)
        .await;

    let handler = FnErrorHandler::new(|resp: &ErrorResponse| {
        if resp.status == 404 {
            ErrorOutcome::Recover(serde_json::json!({
                "output": {"task_id": "t-gone", "task_status": "UNKNOWN"}
            }))
        } else {
            ErrorOutcome::PassThrough
        }
    });
    let api = fixture.client_with(|b| b.error_handler(Arc::new(handler)));

    let resp = api.get_image_gen_task_result("t-gone").await.expect("recovered");
    mock.assert_async().await;
    assert_eq!(resp.status(), 404);
    assert_eq!(
        resp.body().and_then(|b| b.task_status()),
        Some(TaskStatus::Unknown)
    );
}

#[tokio::test]
async fn pass_through_handler_returns_error_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", submit_path("image2image").as_str())
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"code":"InvalidParameter","message":"base_image_url is required","request_id":"r-400"}"#)
        .create_async()
        .await;

    let api = fixture.client_with(|b| b.error_handler(Arc::new(PassThroughErrorHandler)));
    let resp = api
        .submit_image_gen_task(ImageRequest::new("wanx2.1-imageedit", "p"))
        .await
        .expect("pass-through keeps the response");
    mock.assert_async().await;

    assert_eq!(resp.status(), 400);
    let body = resp.body().expect("body");
    assert_eq!(body.code.as_deref(), Some("InvalidParameter"));
    assert!(body.task_id().is_none());
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Port 1 is reserved and nothing listens there.
    let api = ImageApi::builder()
        .api_key("tok")
        .unwrap()
        .base_url("http://127.0.0.1:1")
        .unwrap()
        .build()
        .unwrap();

    let err = api.get_image_gen_task_result("t-1").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "unexpected error: {err}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn missing_api_key_fails_without_network() {
    let mut fixture = MockServerFixture::new().await;
    let guards = fixture.mock_no_requests().await;

    let err = ImageApi::builder()
        .base_url(fixture.base_url.as_str())
        .unwrap()
        .workspace_id("ws-1")
        .build()
        .unwrap_err();
    assert!(err.is_invalid_argument());

    for guard in guards {
        guard.assert_async().await;
    }
}
