//! Retry and timeout policy around generation backends.

use std::time::Duration;
use vlm_bench_application::RetryingBackend;
use vlm_bench_domain::{ContentItem, GenerationError, GenerationPolicy};
use vlm_bench_infrastructure::GenerationBackend;
use vlm_bench_testing::MockGenerationBackend;

fn policy(retry: u32) -> GenerationPolicy {
    GenerationPolicy {
        retry,
        wait: Duration::from_secs(5),
        timeout: Duration::from_secs(60),
    }
}

fn prompt() -> Vec<ContentItem> {
    vec![
        ContentItem::video("clips/0001.mp4"),
        ContentItem::text("What is the person doing?"),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_retries_transient_errors() {
    let mock = MockGenerationBackend::new("mock");
    let mock = mock
        .clone()
        .then_err(mock.unavailable())
        .then_err(mock.unavailable())
        .then_ok("A");

    let backend = RetryingBackend::new(mock.clone(), policy(5));
    let answer = backend.generate(&prompt()).await.unwrap();

    assert_eq!(answer, "A");
    assert_eq!(mock.call_count(), 3);
    assert_eq!(mock.requests()[0], prompt());
}

#[tokio::test(start_paused = true)]
async fn test_gives_up_after_retry_budget() {
    let mock = MockGenerationBackend::new("mock");
    let mut scripted = mock.clone();
    for _ in 0..5 {
        scripted = scripted.then_err(mock.unavailable());
    }

    let backend = RetryingBackend::new(scripted, policy(2));
    let err = backend.generate(&prompt()).await.unwrap_err();

    assert!(matches!(err, GenerationError::Status { status: 503, .. }));
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_error_returned_immediately() {
    let mock = MockGenerationBackend::new("mock").then_err(GenerationError::InvalidResponse {
        backend: "mock".to_string(),
        message: "not json".to_string(),
    });

    let backend = RetryingBackend::new(mock.clone(), policy(5));
    let err = backend.generate(&prompt()).await.unwrap_err();

    assert!(matches!(err, GenerationError::InvalidResponse { .. }));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_times_out() {
    let mock = MockGenerationBackend::new("slow")
        .with_fallback("late")
        .with_delay(Duration::from_secs(120));

    let backend = RetryingBackend::new(mock.clone(), policy(1));
    let err = backend.generate(&prompt()).await.unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Timeout { timeout_ms: 60_000, .. }
    ));
    assert_eq!(mock.call_count(), 2);
}
