//! Task submission: endpoint routing, async header, default headers.

use crate::integration::mock_server::{submit_path, MockServerFixture, PENDING_BODY};
use dashscope_image::{models, ImageParameters, ImageRequest, TaskStatus};
use mockito::Matcher;

#[tokio::test]
async fn image_edit_model_posts_to_image2image() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_submit("image2image", "wanx2.1-imageedit", 200, PENDING_BODY)
        .await;

    let api = fixture.client();
    let request = ImageRequest::new("wanx2.1-imageedit", "turn the sky purple")
        .with_function("description_edit")
        .with_base_image_url("https://example.com/base.png");
    let resp = tokio_test::assert_ok!(api.submit_image_gen_task(request).await);

    mock.assert_async().await;
    assert_eq!(resp.status(), 200);
    let body = resp.body().expect("body");
    assert_eq!(body.task_id(), Some("t-1"));
    assert_eq!(body.task_status(), Some(TaskStatus::Pending));
}

#[tokio::test]
async fn qwen_image_posts_to_text2image() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_submit("text2image", "qwen-image", 200, PENDING_BODY)
        .await;

    let resp = fixture
        .client()
        .submit_image_gen_task(ImageRequest::new("qwen-image", "a red fox in snow"))
        .await
        .expect("submit");

    mock.assert_async().await;
    assert!(resp.is_success());
}

#[tokio::test]
async fn every_image_to_image_model_uses_image2image() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", submit_path("image2image").as_str())
        .match_header("x-dashscope-async", "enable")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PENDING_BODY)
        .expect(models::IMAGE_TO_IMAGE_MODELS.len())
        .create_async()
        .await;

    let api = fixture.client();
    for model in models::IMAGE_TO_IMAGE_MODELS {
        api.submit_image_gen_task(ImageRequest::new(*model, "p"))
            .await
            .unwrap_or_else(|e| panic!("{model}: {e}"));
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_model_falls_back_to_text2image() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_submit("text2image", "brand-new-model-v9", 200, PENDING_BODY)
        .await;

    fixture
        .client()
        .submit_image_gen_task(ImageRequest::new("brand-new-model-v9", "p"))
        .await
        .expect("unknown models are not rejected");
    mock.assert_async().await;
}

#[tokio::test]
async fn request_payload_is_sent_as_json() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", submit_path("text2image").as_str())
        .match_body(Matcher::Json(serde_json::json!({
            "model": "wanx-v1",
            "input": {"prompt": "a lighthouse", "negative_prompt": "people"},
            "parameters": {"size": "1024*1024", "n": 2}
        })))
        .with_status(200)
        .with_body(PENDING_BODY)
        .create_async()
        .await;

    let request = ImageRequest::new(models::WANX_V1, "a lighthouse")
        .with_negative_prompt("people")
        .with_parameters(ImageParameters {
            size: Some("1024*1024".into()),
            n: Some(2),
            ..Default::default()
        });
    fixture
        .client()
        .submit_image_gen_task(request)
        .await
        .expect("submit");
    mock.assert_async().await;
}

#[tokio::test]
async fn workspace_header_forwarded_only_when_set() {
    let mut fixture = MockServerFixture::new().await;
    let with_ws = fixture
        .server
        .mock("POST", submit_path("text2image").as_str())
        .match_header("x-dashscope-workspace", "ws-1")
        .with_status(200)
        .with_body(PENDING_BODY)
        .create_async()
        .await;
    let without_ws = fixture
        .server
        .mock("POST", submit_path("text2image").as_str())
        .match_header("x-dashscope-workspace", Matcher::Missing)
        .with_status(200)
        .with_body(PENDING_BODY)
        .create_async()
        .await;

    fixture
        .client_with(|b| b.workspace_id("ws-1"))
        .submit_image_gen_task(ImageRequest::new("qwen-image", "p"))
        .await
        .expect("submit with workspace");
    fixture
        .client_with(|b| b.workspace_id(""))
        .submit_image_gen_task(ImageRequest::new("qwen-image", "p"))
        .await
        .expect("submit without workspace");

    with_ws.assert_async().await;
    without_ws.assert_async().await;
}

#[tokio::test]
async fn empty_response_body_yields_no_body() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", submit_path("text2image").as_str())
        .with_status(202)
        .create_async()
        .await;

    let resp = fixture
        .client()
        .submit_image_gen_task(ImageRequest::new("qwen-image", "p"))
        .await
        .expect("submit");
    mock.assert_async().await;
    assert_eq!(resp.status(), 202);
    assert!(resp.body().is_none());
}
