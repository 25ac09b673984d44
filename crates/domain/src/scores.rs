//! Per-model per-test score maps.
//!
//! Scores are stored already normalized into `[0, 1]`. Both levels of the
//! map keep insertion order: the model order decides tie-breaks when picking
//! the best model for a test, and the test order is the order in which
//! score files were discovered.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Label of the derived aggregate column in combined reports
pub const MEAN_LABEL: &str = "Mean";

/// Label of the derived aggregate column in partitioned reports
pub const AVERAGE_LABEL: &str = "Average";

/// Test name -> normalized score for a single model
pub type ModelScores = IndexMap<String, f64>;

/// Rescale a raw benchmark score into `[0, 1]`.
///
/// Values above 100 are totals on a 0-2000 scale (MME), values above 1 are
/// percentages, anything else is already a fraction.
pub fn normalize_score(raw: f64) -> f64 {
    if raw > 100.0 {
        raw / 2000.0
    } else if raw > 1.0 {
        raw / 100.0
    } else {
        raw
    }
}

/// Model name -> test name -> normalized score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestScores(IndexMap<String, ModelScores>);

impl TestScores {
    /// Create an empty score record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) all scores of a model
    pub fn insert_model(&mut self, model: impl Into<String>, scores: ModelScores) {
        self.0.insert(model.into(), scores);
    }

    /// Set a single score, creating the model entry if needed
    pub fn set(&mut self, model: &str, test: &str, score: f64) {
        self.0
            .entry(model.to_string())
            .or_default()
            .insert(test.to_string(), score);
    }

    /// Scores of a model
    pub fn model(&self, model: &str) -> Option<&ModelScores> {
        self.0.get(model)
    }

    /// A single score, if recorded
    pub fn score(&self, model: &str, test: &str) -> Option<f64> {
        self.0.get(model).and_then(|s| s.get(test)).copied()
    }

    /// A single score, with missing entries counted as zero
    pub fn score_or_zero(&self, model: &str, test: &str) -> f64 {
        self.score(model, test).unwrap_or(0.0)
    }

    /// Whether the model has an entry (possibly empty)
    pub fn contains_model(&self, model: &str) -> bool {
        self.0.contains_key(model)
    }

    /// Model names in insertion order
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Union of test names over all models, in first-seen order
    pub fn test_types(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for scores in self.0.values() {
            for test in scores.keys() {
                if !seen.iter().any(|t| t == test) {
                    seen.push(test.clone());
                }
            }
        }
        seen
    }

    /// Iterate over `(model, scores)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelScores)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of models
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no model has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ModelScores)> for TestScores {
    fn from_iter<I: IntoIterator<Item = (String, ModelScores)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
