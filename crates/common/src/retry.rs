//! Retry utilities.
//!
//! Generation backends are retried a fixed number of times with a constant
//! pause between attempts.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use vlm_bench_domain::GenerationPolicy;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Attempts after the first one (0 means no retries)
    pub max_attempts: u32,

    /// Pause before every retry
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&GenerationPolicy::default())
    }
}

impl From<&GenerationPolicy> for RetryConfig {
    fn from(policy: &GenerationPolicy) -> Self {
        Self::new(policy.retry, policy.wait)
    }
}

impl RetryConfig {
    /// `max_attempts` retries, `delay` apart.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Retry an async operation while `should_retry` accepts the error.
///
/// The operation runs once, then up to `config.max_attempts` more times.
/// The last error is returned when attempts run out or the error is not
/// retryable.
///
/// # Examples
///
/// ```no_run
/// use vlm_bench_common::retry::{retry_with_predicate, RetryConfig};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let config = RetryConfig::new(3, Duration::from_secs(1));
///
///     let result = retry_with_predicate(
///         config,
///         || async { Err::<(), _>(std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout")) },
///         |err| err.kind() == std::io::ErrorKind::TimedOut,
///     )
///     .await;
///     assert!(result.is_err());
/// }
/// ```
pub async fn retry_with_predicate<F, Fut, T, E, P>(
    config: RetryConfig,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut retries = 0;

    loop {
        let error = match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => error,
        };

        if !should_retry(&error) || retries >= config.max_attempts {
            return Err(error);
        }

        retries += 1;
        tracing::debug!(
            attempt = retries,
            delay_ms = config.delay.as_millis() as u64,
            "Retrying operation after retryable error"
        );
        sleep(config.delay).await;
    }
}
