//! Report commands

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::commands::CommandContext;
use crate::output::{colors, emit, TableFormatter};
use vlm_bench_application::{PartitionedReportRequest, ReportOutcome, StandardReportRequest};

fn print_outcome(ctx: &CommandContext, outcome: &ReportOutcome) -> Result<()> {
    emit(ctx.format, outcome, || {
        let models: Vec<String> = outcome.scores.model_names().map(str::to_string).collect();
        let mut out = TableFormatter::comparison(&models, &outcome.scores, &outcome.columns, &outcome.winners);
        if !outcome.custom_columns.is_empty() {
            out.push('\n');
            out.push_str(&TableFormatter::comparison(
                &models,
                &outcome.scores,
                &outcome.custom_columns,
                &outcome.winners,
            ));
        }
        out.push_str(&format!(
            "\n{} {}",
            colors::success("Report written to"),
            outcome.report_path.display()
        ));
        for plot in &outcome.plots {
            if let Some(path) = &plot.path {
                out.push_str(&format!(
                    "\n{} {} ({} points)",
                    colors::dim("plot"),
                    path.display(),
                    plot.points.len()
                ));
            }
        }
        out
    })
}

/// Combined report over the models of the given families
pub fn standard(
    ctx: &CommandContext,
    families: Vec<String>,
    tests: Vec<String>,
    report_name: Option<String>,
    overwrite: bool,
) -> Result<()> {
    let models = ctx.registry.models_in_families(&families);
    if models.is_empty() {
        bail!("No registered model belongs to families: {}", families.join(", "));
    }

    let request = StandardReportRequest {
        models,
        tests,
        report_name: report_name.unwrap_or_else(|| ctx.config.report.report_name.clone()),
        overwrite,
    };
    debug!(models = request.models.len(), tests = ?request.tests, "Building standard report");
    let outcome = ctx
        .assembler()
        .standard(&request)
        .with_context(|| format!("Failed to build report '{}'", request.report_name))?;

    print_outcome(ctx, &outcome)
}

/// Report with standard and custom tables over the given (or all) models
pub fn partitioned(
    ctx: &CommandContext,
    models: Vec<String>,
    custom: Vec<String>,
    report_name: Option<String>,
) -> Result<()> {
    let models = if models.is_empty() {
        ctx.registry.models().map(|m| m.name.clone()).collect()
    } else {
        models
    };
    let custom_tests = if custom.is_empty() {
        ctx.config.report.custom_tests.clone()
    } else {
        custom
    };

    let request = PartitionedReportRequest {
        models,
        custom_tests,
        report_name: report_name.unwrap_or_else(|| ctx.config.report.report_name.clone()),
    };
    debug!(
        models = request.models.len(),
        custom = ?request.custom_tests,
        "Building partitioned report"
    );
    let outcome = ctx
        .assembler()
        .partitioned(&request)
        .with_context(|| format!("Failed to build report '{}'", request.report_name))?;

    print_outcome(ctx, &outcome)
}
