//! Integration tests for the local-server generation client

use serde_json::json;
use vlm_bench_common::GenerationConfig;
use vlm_bench_domain::{ContentItem, GenerationError};
use vlm_bench_infrastructure::{GenerationBackend, LocalServerBackend};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> GenerationConfig {
    GenerationConfig {
        api_base: server.uri(),
        api_key: "none".to_string(),
        model: "local_server".to_string(),
        ..GenerationConfig::default()
    }
}

#[tokio::test]
async fn test_generate_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer none"))
        .and(body_partial_json(json!({
            "model": "local_server",
            "temperature": 0.0,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "Which action?"},
                    {"type": "video_url", "video_url": {"url": "clip.mp4"}}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "AB"}},
                {"message": {"role": "assistant", "content": "C"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = LocalServerBackend::from_config(&config_for(&server)).unwrap();
    let answer = backend
        .generate(&[ContentItem::text("Which action?"), ContentItem::video("clip.mp4")])
        .await
        .unwrap();

    assert_eq!(answer, "AB");
}

#[tokio::test]
async fn test_generate_without_choices_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let backend = LocalServerBackend::from_config(&config_for(&server)).unwrap();
    let answer = backend.generate(&[ContentItem::text("hi")]).await.unwrap();

    assert_eq!(answer, "");
}

#[tokio::test]
async fn test_server_error_is_retryable_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading model"))
        .mount(&server)
        .await;

    let backend = LocalServerBackend::from_config(&config_for(&server)).unwrap();
    let err = backend.generate(&[ContentItem::text("hi")]).await.unwrap_err();

    match &err {
        GenerationError::Status { status, message, .. } => {
            assert_eq!(*status, 503);
            assert_eq!(message, "loading model");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_bad_request_is_not_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad"))
        .mount(&server)
        .await;

    let backend = LocalServerBackend::from_config(&config_for(&server)).unwrap();
    let err = backend.generate(&[ContentItem::text("hi")]).await.unwrap_err();

    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = LocalServerBackend::from_config(&config_for(&server)).unwrap();
    let err = backend.generate(&[ContentItem::text("hi")]).await.unwrap_err();

    assert!(matches!(err, GenerationError::InvalidResponse { .. }));
}
