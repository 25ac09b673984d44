//! Mock generation backend.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vlm_bench_domain::{ContentItem, GenerationError};
use vlm_bench_infrastructure::GenerationBackend;

/// Backend answering from a script of results.
///
/// Each call pops the next scripted result; once the script is used up
/// every call returns `fallback`. An optional delay runs before each
/// answer so timeouts can be exercised with a paused clock.
#[derive(Clone)]
pub struct MockGenerationBackend {
    name: String,
    script: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    fallback: String,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Vec<ContentItem>>>>,
}

impl MockGenerationBackend {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: String::new(),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful answer
    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Ok(text.into()));
        self
    }

    /// Queue a failure
    pub fn then_err(self, error: GenerationError) -> Self {
        self.script.lock().push_back(Err(error));
        self
    }

    /// Answer once the script is exhausted
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = text.into();
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `generate` calls so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub fn requests(&self) -> Vec<Vec<ContentItem>> {
        self.requests.lock().clone()
    }

    /// A retryable server error
    pub fn unavailable(&self) -> GenerationError {
        GenerationError::Status {
            backend: self.name.clone(),
            status: 503,
            message: "Service Unavailable".to_string(),
        }
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, message: &[ContentItem]) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(message.to_vec());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
