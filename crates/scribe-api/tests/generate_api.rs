//! Integration tests for POST /api/generate_post/ against a fake completion
//! service.

mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::json;

use scribe_api::generate::GeneratedContent;

use common::{build_test_app, spawn_upstream, upstream_returning};

#[tokio::test]
async fn generates_and_stores_post() {
    let upstream = upstream_returning("\n  Rust is a systems language. It is fast!  ").await;
    let app = build_test_app(&upstream.url, GeneratedContent::Raw);

    let (status, post) = app
        .post("/api/generate_post/", json!({ "prompt": "the future of ai" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "The Future Of Ai");
    assert_eq!(post["content"], "Rust is a systems language. It is fast!");
    assert_eq!(post["author"], "AI Bot");
    assert_eq!(upstream.calls(), 1);

    let (status, fetched) = app.get(&format!("/api/posts/{}/", post["id"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, post);
}

#[tokio::test]
async fn raw_mode_stores_untrimmed_fragment() {
    let upstream = upstream_returning("This is great. And unfinished").await;
    let app = build_test_app(&upstream.url, GeneratedContent::Raw);

    let (status, post) = app.post("/api/generate_post/", json!({ "prompt": "tests" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["content"], "This is great. And unfinished");
}

#[tokio::test]
async fn cleaned_mode_drops_trailing_fragment() {
    let upstream = upstream_returning("This is great. And unfinished").await;
    let app = build_test_app(&upstream.url, GeneratedContent::Cleaned);

    let (status, post) = app.post("/api/generate_post/", json!({ "prompt": "tests" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["content"], "This is great.");
}

#[tokio::test]
async fn missing_or_empty_prompt_is_rejected() {
    let upstream = upstream_returning("unused.").await;
    let app = build_test_app(&upstream.url, GeneratedContent::Raw);

    for body in [json!({}), json!({ "prompt": "" }), json!({ "prompt": null }), json!({ "prompt": 5 })] {
        let (status, resp) = app.post("/api/generate_post/", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, json!({ "error": "Prompt is required" }));
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate_post/")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(upstream.calls(), 0);
    assert_eq!(app.post_count(), 0);
}

#[tokio::test]
async fn upstream_error_status_creates_nothing() {
    let upstream = spawn_upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "model crashed" }),
        Duration::ZERO,
    )
    .await;
    let app = build_test_app(&upstream.url, GeneratedContent::Raw);

    let (status, body) = app.post("/api/generate_post/", json!({ "prompt": "anything" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to generate blog post" }));
    assert_eq!(upstream.calls(), 1);
    assert_eq!(app.post_count(), 0);
}

#[tokio::test]
async fn upstream_timeout_creates_nothing() {
    // The test client times out after 500ms.
    let upstream = spawn_upstream(
        StatusCode::OK,
        json!({ "choices": [{ "text": "Too late." }] }),
        Duration::from_secs(3),
    )
    .await;
    let app = build_test_app(&upstream.url, GeneratedContent::Raw);

    let (status, body) = app.post("/api/generate_post/", json!({ "prompt": "slow" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate blog post");
    assert_eq!(app.post_count(), 0);
}

#[tokio::test]
async fn malformed_upstream_body_creates_nothing() {
    let upstream = spawn_upstream(StatusCode::OK, json!({ "choices": [] }), Duration::ZERO).await;
    let app = build_test_app(&upstream.url, GeneratedContent::Raw);

    let (status, _) = app.post("/api/generate_post/", json!({ "prompt": "empty" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.post_count(), 0);
}

#[tokio::test]
async fn unreachable_upstream_is_server_error() {
    let app = common::build_crud_app();

    let (status, body) = app.post("/api/generate_post/", json!({ "prompt": "offline" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to generate blog post");
    assert_eq!(app.post_count(), 0);
}
