//! A single client shared across tasks.

use crate::integration::mock_server::{submit_path, MockServerFixture, PENDING_BODY, SUCCEEDED_BODY};
use dashscope_image::ImageRequest;
use mockito::Matcher;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_submits_and_lookups() {
    const CALLS: usize = 8;

    let mut fixture = MockServerFixture::new().await;
    let submits = fixture
        .server
        .mock("POST", submit_path("text2image").as_str())
        .match_header("x-dashscope-async", "enable")
        .with_status(200)
        .with_body(PENDING_BODY)
        .expect(CALLS)
        .create_async()
        .await;
    let lookups = fixture
        .server
        .mock("GET", Matcher::Regex(r"^/api/v1/tasks/t-\d+$".to_string()))
        .with_status(200)
        .with_body(SUCCEEDED_BODY)
        .expect(CALLS)
        .create_async()
        .await;

    let api = fixture.client();
    let mut handles = Vec::with_capacity(CALLS * 2);
    for i in 0..CALLS {
        let submit_api = api.clone();
        handles.push(tokio::spawn(async move {
            submit_api
                .submit_image_gen_task(ImageRequest::new("wanx2.1-t2i-turbo", format!("prompt {i}")))
                .await
                .map(|r| r.status())
        }));
        let lookup_api = api.clone();
        handles.push(tokio::spawn(async move {
            lookup_api
                .get_image_gen_task_result(&format!("t-{i}"))
                .await
                .map(|r| r.status())
        }));
    }

    for handle in handles {
        let status = handle.await.expect("task panicked").expect("request failed");
        assert_eq!(status, 200);
    }

    submits.assert_async().await;
    lookups.assert_async().await;
}
