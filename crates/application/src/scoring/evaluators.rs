//! Dataset evaluators.
//!
//! An evaluator loads a prediction file for its dataset, scores it, and
//! names the suffix of the score file written next to the predictions.

use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};
use vlm_bench_domain::{CandidateRow, DimensionRow, EvaluationError, MultiLabelRow, ScoreTable};
use vlm_bench_infrastructure::{load_rows, score_path, write_score_table};

use super::{dimension, multilabel, per_category};

/// Suffix of score files written by most evaluators
pub const SCORE_SUFFIX: &str = "_score.csv";

/// Suffix of accuracy files written by rollup evaluators
pub const ACC_SUFFIX: &str = "_acc.csv";

/// Scores the prediction file of a dataset
pub trait DatasetEvaluator: Send + Sync {
    /// Evaluator name
    fn name(&self) -> &'static str;

    /// Suffix replacing the extension of the evaluated file
    fn score_suffix(&self) -> &'static str {
        SCORE_SUFFIX
    }

    /// Load and score a prediction file
    fn score_file(&self, path: &Path) -> Result<ScoreTable, EvaluationError>;
}

/// Global micro F1 over multi-label answers
pub struct MultiLabelEvaluator;

impl DatasetEvaluator for MultiLabelEvaluator {
    fn name(&self) -> &'static str {
        "hico"
    }

    fn score_file(&self, path: &Path) -> Result<ScoreTable, EvaluationError> {
        let rows: Vec<MultiLabelRow> = load_rows(path)?;
        Ok(multilabel::score_multilabel(&rows))
    }
}

/// Per-activity precision/recall/F1
pub struct PerCategoryEvaluator;

impl DatasetEvaluator for PerCategoryEvaluator {
    fn name(&self) -> &'static str {
        "virat"
    }

    fn score_file(&self, path: &Path) -> Result<ScoreTable, EvaluationError> {
        let rows: Vec<CandidateRow> = load_rows(path)?;
        per_category::score_per_category(&rows)
    }
}

/// Dimension/task-type accuracy rollup
pub struct DimensionRollupEvaluator;

impl DatasetEvaluator for DimensionRollupEvaluator {
    fn name(&self) -> &'static str {
        "tempcompass"
    }

    fn score_suffix(&self) -> &'static str {
        ACC_SUFFIX
    }

    fn score_file(&self, path: &Path) -> Result<ScoreTable, EvaluationError> {
        let rows: Vec<DimensionRow> = load_rows(path)?;
        dimension::score_dimensions(&rows)
    }
}

/// Result of evaluating one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    pub dataset: String,
    pub evaluator: &'static str,
    pub table: ScoreTable,
    pub score_file: PathBuf,
}

/// Dataset name -> evaluator
#[derive(Clone, Default)]
pub struct EvaluatorRegistry {
    evaluators: IndexMap<String, Arc<dyn DatasetEvaluator>>,
}

impl EvaluatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of the datasets with dedicated scoring
    pub fn builtin() -> Self {
        let hico: Arc<dyn DatasetEvaluator> = Arc::new(MultiLabelEvaluator);
        let virat: Arc<dyn DatasetEvaluator> = Arc::new(PerCategoryEvaluator);
        let tempcompass: Arc<dyn DatasetEvaluator> = Arc::new(DimensionRollupEvaluator);

        let mut registry = Self::new();
        registry.register("HICO", hico.clone());
        registry.register("HICO_Mini", hico);
        registry.register("Virat_MCQ", virat);
        registry.register("TempCompass", tempcompass.clone());
        registry.register("TempCompass_MCQ_YorN", tempcompass);
        registry
    }

    /// Register (or replace) the evaluator of a dataset
    pub fn register(&mut self, dataset: impl Into<String>, evaluator: Arc<dyn DatasetEvaluator>) {
        self.evaluators.insert(dataset.into(), evaluator);
    }

    /// Evaluator of a dataset
    pub fn for_dataset(&self, dataset: &str) -> Result<Arc<dyn DatasetEvaluator>, EvaluationError> {
        self.evaluators
            .get(dataset)
            .cloned()
            .ok_or_else(|| EvaluationError::UnknownDataset(dataset.to_string()))
    }

    /// Registered dataset names with their evaluator names
    pub fn datasets(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.evaluators.iter().map(|(k, v)| (k.as_str(), v.name()))
    }

    /// Score `path` with the evaluator of `dataset` and write the score
    /// table next to it.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn evaluate(&self, dataset: &str, path: &Path) -> Result<EvaluationOutcome, EvaluationError> {
        let evaluator = self.for_dataset(dataset)?;
        let table = evaluator.score_file(path)?;
        let score_file = score_path(path, evaluator.score_suffix());
        write_score_table(&score_file, &table)?;

        info!(
            dataset = %dataset,
            evaluator = evaluator.name(),
            headline = ?table.headline(),
            "Evaluation complete"
        );

        Ok(EvaluationOutcome {
            dataset: dataset.to_string(),
            evaluator: evaluator.name(),
            table,
            score_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = EvaluatorRegistry::builtin();
        assert_eq!(registry.for_dataset("HICO_Mini").unwrap().name(), "hico");
        assert_eq!(registry.for_dataset("Virat_MCQ").unwrap().name(), "virat");

        let tempcompass = registry.for_dataset("TempCompass").unwrap();
        assert_eq!(tempcompass.score_suffix(), ACC_SUFFIX);

        assert!(matches!(
            registry.for_dataset("MMBench"),
            Err(EvaluationError::UnknownDataset(_))
        ));
    }

    #[test]
    fn test_datasets_listing_order() {
        let registry = EvaluatorRegistry::builtin();
        let names: Vec<_> = registry.datasets().map(|(d, _)| d).collect();
        assert_eq!(
            names,
            vec!["HICO", "HICO_Mini", "Virat_MCQ", "TempCompass", "TempCompass_MCQ_YorN"]
        );
    }
}
