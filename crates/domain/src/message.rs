//! Generation interface types.
//!
//! A generation request is an ordered list of typed content items; the
//! backend answers with plain text.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One item of a multimodal prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ContentItem {
    /// Prompt text
    Text(String),
    /// Image path or URL
    Image(String),
    /// Video path or URL
    Video(String),
}

impl ContentItem {
    /// Shorthand for a text item
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Shorthand for an image item
    pub fn image(value: impl Into<String>) -> Self {
        Self::Image(value.into())
    }

    /// Shorthand for a video item
    pub fn video(value: impl Into<String>) -> Self {
        Self::Video(value.into())
    }
}

/// Retry and timeout policy every generation backend honors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPolicy {
    /// Retries after the first failed attempt
    pub retry: u32,
    /// Pause between attempts
    pub wait: Duration,
    /// Upper bound for a single call
    pub timeout: Duration,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            retry: 5,
            wait: Duration::from_secs(5),
            timeout: Duration::from_secs(60),
        }
    }
}
