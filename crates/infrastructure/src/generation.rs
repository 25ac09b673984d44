//! Generation backends.
//!
//! A backend turns an ordered list of content items into generated text.
//! [`LocalServerBackend`] talks to any OpenAI-compatible chat-completions
//! server; retry and timeout policy is applied by the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use vlm_bench_common::GenerationConfig;
use vlm_bench_domain::{ContentItem, GenerationError};

/// A model that answers multimodal prompts with text
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Backend name, used in errors and logs
    fn name(&self) -> &str;

    /// Generate a response for one prompt
    async fn generate(&self, message: &[ContentItem]) -> Result<String, GenerationError>;
}

/// Client for a local OpenAI-compatible server
#[derive(Clone)]
pub struct LocalServerBackend {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: MediaUrl },
    VideoUrl { video_url: MediaUrl },
}

#[derive(Debug, Serialize, PartialEq)]
struct MediaUrl {
    url: String,
}

impl From<&ContentItem> for ContentPart {
    fn from(item: &ContentItem) -> Self {
        match item {
            ContentItem::Text(text) => Self::Text { text: text.clone() },
            ContentItem::Image(url) => Self::ImageUrl {
                image_url: MediaUrl { url: url.clone() },
            },
            ContentItem::Video(url) => Self::VideoUrl {
                video_url: MediaUrl { url: url.clone() },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LocalServerBackend {
    /// Create a client from the generation configuration
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::Request {
                backend: config.model.clone(),
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    /// Chat-completions endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl GenerationBackend for LocalServerBackend {
    fn name(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, message), fields(backend = %self.model, items = message.len()))]
    async fn generate(&self, message: &[ContentItem]) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: message.iter().map(ContentPart::from).collect(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        backend: self.model.clone(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    GenerationError::Request {
                        backend: self.model.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GenerationError::Status {
                backend: self.model.clone(),
                status: status.as_u16(),
                message: body,
            });
        }

        let body: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| GenerationError::InvalidResponse {
                    backend: self.model.clone(),
                    message: e.to_string(),
                })?;

        let answer = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!(chars = answer.len(), "Received generation");
        Ok(answer)
    }
}
