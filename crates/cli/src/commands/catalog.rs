//! Model registry and dataset catalog commands

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::commands::CommandContext;
use crate::output::{colors, emit, TableFormatter};
use vlm_bench_domain::{dataset_catalog, DatasetError, ModelConfig};
use vlm_bench_infrastructure::prepare_descriptor;

#[derive(Debug, Serialize)]
struct ModelListing<'a> {
    #[serde(flatten)]
    config: &'a ModelConfig,
    marker: Option<String>,
    color: Option<String>,
}

/// List registered models with their plot style
pub fn models(ctx: &CommandContext) -> Result<()> {
    let listing: Vec<ModelListing> = ctx
        .registry
        .models()
        .map(|config| {
            let style = ctx.registry.family(&config.base_name);
            ModelListing {
                config,
                marker: style.map(|s| s.marker.symbol().to_string()),
                color: style.map(|s| s.color.name().to_string()),
            }
        })
        .collect();

    emit(ctx.format, &listing, || {
        TableFormatter::simple(
            &["Model", "Family", "Params (B)", "Marker", "Color"],
            listing
                .iter()
                .map(|m| {
                    vec![
                        m.config.name.clone(),
                        m.config.base_name.clone(),
                        format!("{:.1}", m.config.num_params),
                        m.marker.clone().unwrap_or_else(|| "-".to_string()),
                        m.color.clone().unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect(),
        )
    })
}

/// List the dataset catalog
pub fn datasets(ctx: &CommandContext) -> Result<()> {
    let catalog = dataset_catalog();

    emit(ctx.format, &catalog, || {
        TableFormatter::simple(
            &["Dataset", "Kind", "Evaluator", "Media", "Checksum"],
            catalog
                .iter()
                .map(|d| {
                    vec![
                        d.name.clone(),
                        d.kind.to_string(),
                        d.evaluator.clone(),
                        d.media_dir.clone().unwrap_or_else(|| "-".to_string()),
                        d.checksum
                            .as_ref()
                            .map(|c| format!("{:?}", c.algorithm).to_lowercase())
                            .unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect(),
        )
    })
}

#[derive(Debug, Serialize)]
struct VerifiedDataset {
    name: String,
    manifest: PathBuf,
    rows: usize,
}

/// Verify that a catalog dataset is present under the data root
pub fn verify(ctx: &CommandContext, name: String) -> Result<()> {
    let descriptor = dataset_catalog()
        .into_iter()
        .find(|d| d.name == name)
        .ok_or_else(|| anyhow!(DatasetError::Unknown(name.clone())))?;

    let prepared = prepare_descriptor(&ctx.config.paths.data_root, &descriptor)
        .with_context(|| format!("Dataset {name} failed verification"))?;

    let verified = VerifiedDataset {
        name,
        manifest: prepared.data_file,
        rows: prepared.rows,
    };
    emit(ctx.format, &verified, || {
        format!(
            "{} {} ({} rows, {})",
            colors::success("✓"),
            verified.name,
            verified.rows,
            verified.manifest.display()
        )
    })
}
