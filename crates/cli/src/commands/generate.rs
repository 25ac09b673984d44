//! Generation command

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::commands::CommandContext;
use crate::output::emit;
use crate::progress::spinner;
use vlm_bench_application::RetryingBackend;
use vlm_bench_domain::ContentItem;
use vlm_bench_infrastructure::{GenerationBackend, LocalServerBackend};

#[derive(Debug, Serialize)]
struct Generation {
    backend: String,
    prompt: Vec<ContentItem>,
    response: String,
}

/// Build a prompt: media first, in the order given, then the text
pub fn build_prompt(text: Option<String>, images: Vec<String>, videos: Vec<String>) -> Vec<ContentItem> {
    images
        .into_iter()
        .map(ContentItem::Image)
        .chain(videos.into_iter().map(ContentItem::Video))
        .chain(text.map(ContentItem::Text))
        .collect()
}

/// Send one prompt to the configured local server
pub async fn generate(
    ctx: &CommandContext,
    text: Option<String>,
    images: Vec<String>,
    videos: Vec<String>,
) -> Result<()> {
    let prompt = build_prompt(text, images, videos);
    if prompt.is_empty() {
        bail!("Nothing to send: pass --text, --image or --video");
    }

    let generation = &ctx.config.generation;
    let backend = RetryingBackend::new(
        LocalServerBackend::from_config(generation)?,
        generation.policy(),
    );

    let sp = spinner(&format!("Waiting for {}...", backend.name()));
    let result = backend.generate(&prompt).await;
    sp.finish_and_clear();

    let response = result.with_context(|| format!("Generation request to {} failed", generation.api_base))?;
    let output = Generation {
        backend: backend.name().to_string(),
        prompt,
        response,
    };
    emit(ctx.format, &output, || output.response.clone())
}
