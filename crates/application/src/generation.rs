//! Retry and timeout policy for generation backends.

use async_trait::async_trait;
use tracing::{instrument, warn};
use vlm_bench_common::{retry_with_predicate, RetryConfig};
use vlm_bench_domain::{ContentItem, GenerationError, GenerationPolicy};
use vlm_bench_infrastructure::GenerationBackend;

/// Wraps a backend with a per-call timeout and linear retries.
///
/// Only retryable errors (transport failures, timeouts, 429/5xx) are
/// retried; the last error is returned once the retries are used up.
pub struct RetryingBackend<B> {
    inner: B,
    policy: GenerationPolicy,
}

impl<B: GenerationBackend> RetryingBackend<B> {
    pub fn new(inner: B, policy: GenerationPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    async fn attempt(&self, message: &[ContentItem]) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.policy.timeout, self.inner.generate(message)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout {
                backend: self.inner.name().to_string(),
                timeout_ms: self.policy.timeout.as_millis() as u64,
            }),
        }
    }
}

#[async_trait]
impl<B: GenerationBackend> GenerationBackend for RetryingBackend<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[instrument(skip(self, message), fields(backend = %self.inner.name(), retry = self.policy.retry))]
    async fn generate(&self, message: &[ContentItem]) -> Result<String, GenerationError> {
        retry_with_predicate(
            RetryConfig::from(&self.policy),
            || self.attempt(message),
            GenerationError::is_retryable,
        )
        .await
        .map_err(|e| {
            warn!(error = %e, "Generation failed");
            e
        })
    }
}
