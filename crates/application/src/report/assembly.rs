//! Report assembly.
//!
//! Two report flavors share the same pipeline: collect per-model scores,
//! derive an aggregate column, pick column winners, render markdown tables,
//! render scatter plots and link them from the report.

use super::aggregate::{augment_mean, augment_with_aggregate, best_of_type, select_plot_scores, Winners};
use super::markdown::render_table;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use vlm_bench_common::{HarnessConfig, PlotConfig};
use vlm_bench_domain::{
    HarnessResult, ModelRegistry, ModelScores, ReportError, TestScores, AVERAGE_LABEL, MEAN_LABEL,
};
use vlm_bench_infrastructure::{
    accepted_set, append_image_link, collect_model_scores, plot_scatter, write_report, ScatterPlot,
    TestNameRule, WriteMode,
};

/// Image of the aggregate plot in partitioned reports
pub const AGGREGATE_PLOT_FILE: &str = "score_vs_params.png";

/// Caption of the aggregate plot in partitioned reports
pub const AGGREGATE_PLOT_CAPTION: &str = "Mean score vs parameters";

/// Request for a combined report over a batch of models
#[derive(Debug, Clone)]
pub struct StandardReportRequest {
    pub models: Vec<String>,
    /// Accepted test names (case-insensitive); empty accepts every test
    pub tests: Vec<String>,
    pub report_name: String,
    pub overwrite: bool,
}

/// Request for a report with standard and custom tables
#[derive(Debug, Clone)]
pub struct PartitionedReportRequest {
    pub models: Vec<String>,
    pub custom_tests: Vec<String>,
    pub report_name: String,
}

/// What a report run produced
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report_path: PathBuf,
    pub scores: TestScores,
    /// Columns of the main table, aggregate last
    pub columns: Vec<String>,
    /// Columns of the custom table (partitioned reports only)
    pub custom_columns: Vec<String>,
    pub winners: Winners,
    pub plots: Vec<ScatterPlot>,
}

/// Builds reports from the score files under an outputs directory
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    registry: ModelRegistry,
    outputs_dir: PathBuf,
    report_dir: PathBuf,
    plot: PlotConfig,
}

impl ReportAssembler {
    /// Create an assembler with explicit directories
    pub fn new(
        registry: ModelRegistry,
        outputs_dir: impl Into<PathBuf>,
        report_dir: impl Into<PathBuf>,
        plot: PlotConfig,
    ) -> Self {
        Self {
            registry,
            outputs_dir: outputs_dir.into(),
            report_dir: report_dir.into(),
            plot,
        }
    }

    /// Create an assembler from configuration
    pub fn from_config(registry: ModelRegistry, config: &HarnessConfig) -> Self {
        Self::new(
            registry,
            &config.paths.outputs_dir,
            &config.paths.report_dir,
            config.plot.clone(),
        )
    }

    /// Path of the markdown report named `name`
    pub fn report_path(&self, name: &str) -> PathBuf {
        self.report_dir.join(format!("{name}.md"))
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    fn render_plot(&self, scores: &ModelScores, file_name: &str, caption: &str, report: &Path) -> HarnessResult<ScatterPlot> {
        let plot = plot_scatter(
            &self.registry,
            scores,
            &self.report_dir.join(file_name),
            caption,
            &self.plot,
        )?;
        append_image_link(report, caption, file_name)?;
        Ok(plot)
    }

    /// Combined report: one table over all accepted tests plus "Mean".
    ///
    /// Models without any score are left out. The table is appended to
    /// the report unless `overwrite` is set, so successive batches build up
    /// one file.
    #[instrument(skip(self, request), fields(report = %request.report_name, models = request.models.len()))]
    pub fn standard(&self, request: &StandardReportRequest) -> HarnessResult<ReportOutcome> {
        let accepted = (!request.tests.is_empty()).then(|| accepted_set(&request.tests));

        let mut scores = TestScores::new();
        for model in &request.models {
            let collected = collect_model_scores(
                &self.outputs_dir,
                model,
                TestNameRule::TrailingSuffix,
                accepted.as_ref(),
            )?;
            if collected.is_empty() {
                debug!(model = %model, "No scores collected, model omitted");
                continue;
            }
            scores.insert_model(model.clone(), collected);
        }

        if scores.is_empty() {
            return Err(ReportError::NoScores.into());
        }

        let mut columns = scores.test_types();
        columns.sort();
        if augment_mean(&mut scores, &columns) {
            columns.push(MEAN_LABEL.to_string());
        }
        let winners = best_of_type(&scores, &columns);

        let models: Vec<String> = scores.model_names().map(str::to_string).collect();
        let table = render_table(&models, &scores, &columns, &winners);

        let report_path = self.report_path(&request.report_name);
        let mode = if request.overwrite {
            WriteMode::Overwrite
        } else {
            WriteMode::Append
        };
        write_report(&report_path, &table, mode)?;

        let (score_name, plot_scores) = select_plot_scores(&scores)?;
        let plot = self.render_plot(
            &plot_scores,
            &format!("{score_name}_score_vs_params.png"),
            &format!("{score_name} score vs parameters"),
            &report_path,
        )?;

        info!(
            path = %report_path.display(),
            models = models.len(),
            columns = columns.len(),
            "Standard report written"
        );

        Ok(ReportOutcome {
            report_path,
            scores,
            columns,
            custom_columns: Vec::new(),
            winners,
            plots: vec![plot],
        })
    }

    /// Partitioned report: standard tests with "Average", then a second
    /// table of custom tests.
    ///
    /// Every requested model gets a row. The report file is overwritten.
    #[instrument(skip(self, request), fields(report = %request.report_name, models = request.models.len()))]
    pub fn partitioned(&self, request: &PartitionedReportRequest) -> HarnessResult<ReportOutcome> {
        if request.models.is_empty() {
            return Err(ReportError::NoScores.into());
        }

        let mut scores = TestScores::new();
        for model in &request.models {
            let collected = collect_model_scores(
                &self.outputs_dir,
                model,
                TestNameRule::FirstToken,
                None,
            )?;
            scores.insert_model(model.clone(), collected);
        }

        let observed = scores.test_types();
        let mut standard: Vec<String> = observed
            .iter()
            .filter(|t| !request.custom_tests.contains(*t))
            .cloned()
            .collect();
        standard.sort();

        augment_with_aggregate(&mut scores, &standard, AVERAGE_LABEL);
        let mut columns = standard.clone();
        if !standard.is_empty() {
            columns.push(AVERAGE_LABEL.to_string());
        }

        let mut ranked = observed;
        for test in request.custom_tests.iter().chain(columns.last()) {
            if !ranked.contains(test) {
                ranked.push(test.clone());
            }
        }
        let winners = best_of_type(&scores, &ranked);

        let mut text = render_table(&request.models, &scores, &columns, &winners);
        text.push_str("\n\n");
        text.push_str(&render_table(
            &request.models,
            &scores,
            &request.custom_tests,
            &winners,
        ));

        let report_path = self.report_path(&request.report_name);
        write_report(&report_path, &text, WriteMode::Overwrite)?;

        let mut plots = Vec::new();
        if !standard.is_empty() {
            let averages = column_scores(&scores, &request.models, AVERAGE_LABEL);
            plots.push(self.render_plot(
                &averages,
                AGGREGATE_PLOT_FILE,
                AGGREGATE_PLOT_CAPTION,
                &report_path,
            )?);
        }
        for test in &request.custom_tests {
            let custom = column_scores(&scores, &request.models, test);
            plots.push(self.render_plot(
                &custom,
                &format!("{}_score_vs_params.png", test.to_lowercase()),
                &format!("{test} score vs parameters"),
                &report_path,
            )?);
        }

        info!(
            path = %report_path.display(),
            standard = standard.len(),
            custom = request.custom_tests.len(),
            plots = plots.len(),
            "Partitioned report written"
        );

        Ok(ReportOutcome {
            report_path,
            scores,
            columns,
            custom_columns: request.custom_tests.clone(),
            winners,
            plots,
        })
    }
}

/// One column as model -> score, missing scores as zero
fn column_scores(scores: &TestScores, models: &[String], test: &str) -> ModelScores {
    models
        .iter()
        .map(|model| (model.clone(), scores.score_or_zero(model, test)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_scores_fill_zero() {
        let mut scores = TestScores::new();
        scores.set("A", "HICO", 0.4);
        scores.insert_model("B", ModelScores::new());

        let column = column_scores(&scores, &["A".to_string(), "B".to_string()], "HICO");
        assert_eq!(column["A"], 0.4);
        assert_eq!(column["B"], 0.0);
    }

    #[test]
    fn test_report_path() {
        let assembler = ReportAssembler::new(
            ModelRegistry::builtin(),
            "outputs",
            "custom/report",
            PlotConfig::default(),
        );
        assert_eq!(
            assembler.report_path("test_report"),
            PathBuf::from("custom/report/test_report.md")
        );
    }
}
