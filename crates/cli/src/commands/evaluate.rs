//! Evaluation-file commands

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::commands::CommandContext;
use crate::output::{colors, emit, TableFormatter};
use vlm_bench_application::EvaluatorRegistry;
use vlm_bench_domain::ModelScores;
use vlm_bench_infrastructure::{accepted_set, collect_model_scores, view_file, LineRange, TestNameRule};

/// Score an evaluation file and write its score table
pub fn evaluate(ctx: &CommandContext, dataset: String, file: PathBuf) -> Result<()> {
    let outcome = EvaluatorRegistry::builtin()
        .evaluate(&dataset, &file)
        .with_context(|| format!("Failed to evaluate {}", file.display()))?;

    emit(ctx.format, &outcome, || {
        let mut out = TableFormatter::score_table(&outcome.table);
        if let Some(headline) = outcome.table.headline() {
            out.push_str(&format!("\n{} {headline:.4}", colors::bold("Headline:")));
        }
        out.push_str(&format!(
            "\n{} {}",
            colors::success("Scores written to"),
            outcome.score_file.display()
        ));
        out
    })
}

#[derive(Debug, Serialize)]
struct CollectedScores {
    model: String,
    outputs_dir: PathBuf,
    scores: ModelScores,
}

/// Show the normalized scores collected for one model
pub fn scores(ctx: &CommandContext, model: String, tests: Vec<String>, first_token: bool) -> Result<()> {
    let accepted = (!tests.is_empty()).then(|| accepted_set(&tests));
    let rule = if first_token {
        TestNameRule::FirstToken
    } else {
        TestNameRule::TrailingSuffix
    };

    let outputs_dir = ctx.config.paths.outputs_dir.clone();
    let scores = collect_model_scores(&outputs_dir, &model, rule, accepted.as_ref())
        .with_context(|| format!("Failed to collect scores for {model}"))?;

    let collected = CollectedScores {
        model,
        outputs_dir,
        scores,
    };
    emit(ctx.format, &collected, || {
        if collected.scores.is_empty() {
            return colors::warning(&format!(
                "No scores found for {} under {}",
                collected.model,
                collected.outputs_dir.display()
            ))
            .to_string();
        }
        TableFormatter::simple(
            &["Test", "Score"],
            collected
                .scores
                .iter()
                .map(|(test, score)| vec![test.clone(), format!("{score:.4}")])
                .collect(),
        )
    })
}

#[derive(Debug, Serialize)]
struct FileView {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Print (a line range of) a tabular file
pub fn view(ctx: &CommandContext, file: PathBuf, lines: Option<LineRange>) -> Result<()> {
    let view = view_file(&file, lines).with_context(|| format!("Failed to read {}", file.display()))?;
    let view = FileView {
        headers: view.headers,
        rows: view.rows,
    };

    emit(ctx.format, &view, || TableFormatter::simple(&view.headers, view.rows.clone()))
}
