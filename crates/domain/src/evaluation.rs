//! Evaluation rows, confusion counts and score tables.

use serde::{Deserialize, Serialize};

/// A row of a multi-label evaluation file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiLabelRow {
    /// Ground truth, one label per character
    pub answer: String,
    /// Raw model output; uppercase characters are the selected labels
    #[serde(default)]
    pub prediction: String,
}

/// A row of a multiple-choice evaluation file that carries its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub answer: String,
    /// Options list, e.g. `"['A. Open door', 'B. Close door']"`
    pub candidates: String,
    #[serde(default)]
    pub prediction: String,
}

/// A row of a per-dimension result table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRow {
    /// Composite `"dimension. task_type"` key
    #[serde(rename = "dim.task_type")]
    pub key: String,
    pub success: f64,
    pub overall: f64,
}

/// True positive / false positive / false negative counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub tp: u64,
    pub fp: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
}

impl ConfusionCounts {
    /// TP / (TP + FP), zero when nothing was predicted
    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    /// TP / (TP + FN), zero when nothing was expected
    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// Harmonic mean of precision and recall, zero when both are zero
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    /// TP / (TP + 0.5 (FP + FN)), zero when all counters are zero
    pub fn micro_f1(&self) -> f64 {
        let denominator = self.tp as f64 + 0.5 * (self.fp + self.fn_) as f64;
        if denominator == 0.0 {
            0.0
        } else {
            self.tp as f64 / denominator
        }
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &ConfusionCounts) {
        self.tp += other.tp;
        self.fp += other.fp;
        self.fn_ += other.fn_;
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Precision / recall / F1 for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMetrics {
    pub category: String,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Accuracy for one row or bucket of a dimension rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionAccuracy {
    #[serde(rename = "dim.task_type")]
    pub key: String,
    pub success: f64,
    pub overall: f64,
    /// Percentage rounded to two decimals
    pub acc: f64,
}

/// Output of a dataset evaluator, written as a `_score.csv`/`_acc.csv` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum ScoreTable {
    /// Single pooled F1
    MicroF1 { f1: f64 },
    /// One row per category followed by a `mean` row
    PerCategory(Vec<CategoryMetrics>),
    /// Original rows followed by aggregated bucket rows
    Dimension(Vec<DimensionAccuracy>),
}

impl ScoreTable {
    /// CSV header row
    pub fn headers(&self) -> Vec<&'static str> {
        match self {
            Self::MicroF1 { .. } => vec!["f1"],
            Self::PerCategory(_) => vec!["Activity", "f1", "precision", "recall"],
            Self::Dimension(_) => vec!["dim.task_type", "success", "overall", "acc"],
        }
    }

    /// CSV data rows, numbers rendered in their shortest exact form
    pub fn rows(&self) -> Vec<Vec<String>> {
        match self {
            Self::MicroF1 { f1 } => vec![vec![f1.to_string()]],
            Self::PerCategory(rows) => rows
                .iter()
                .map(|m| {
                    vec![
                        m.category.clone(),
                        m.f1.to_string(),
                        m.precision.to_string(),
                        m.recall.to_string(),
                    ]
                })
                .collect(),
            Self::Dimension(rows) => rows
                .iter()
                .map(|d| {
                    vec![
                        d.key.clone(),
                        d.success.to_string(),
                        d.overall.to_string(),
                        d.acc.to_string(),
                    ]
                })
                .collect(),
        }
    }

    /// The headline value: pooled F1, mean F1, or overall accuracy
    pub fn headline(&self) -> Option<f64> {
        match self {
            Self::MicroF1 { f1 } => Some(*f1),
            Self::PerCategory(rows) => rows.iter().find(|m| m.category == "mean").map(|m| m.f1),
            Self::Dimension(rows) => rows.iter().find(|d| d.key == "overall").map(|d| d.acc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominators() {
        let counts = ConfusionCounts::default();
        assert_eq!(counts.precision(), 0.0);
        assert_eq!(counts.recall(), 0.0);
        assert_eq!(counts.f1(), 0.0);
        assert_eq!(counts.micro_f1(), 0.0);
    }

    #[test]
    fn test_precision_recall_f1() {
        let counts = ConfusionCounts { tp: 3, fp: 1, fn_: 2 };
        assert_eq!(counts.precision(), 0.75);
        assert_eq!(counts.recall(), 0.6);
        let f1 = counts.f1();
        assert!((f1 - 2.0 * 0.75 * 0.6 / 1.35).abs() < 1e-12);
        assert!((counts.micro_f1() - 3.0 / 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_merge() {
        let mut a = ConfusionCounts { tp: 1, fp: 0, fn_: 1 };
        a.merge(&ConfusionCounts { tp: 2, fp: 3, fn_: 0 });
        assert_eq!(a, ConfusionCounts { tp: 3, fp: 3, fn_: 1 });
    }

    #[test]
    fn test_score_table_rows() {
        let table = ScoreTable::MicroF1 { f1: 1.0 };
        assert_eq!(table.headers(), vec!["f1"]);
        assert_eq!(table.rows(), vec![vec!["1".to_string()]]);
        assert_eq!(table.headline(), Some(1.0));

        let table = ScoreTable::Dimension(vec![DimensionAccuracy {
            key: "overall".to_string(),
            success: 4.0,
            overall: 10.0,
            acc: 40.0,
        }]);
        assert_eq!(table.rows()[0], vec!["overall", "4", "10", "40"]);
        assert_eq!(table.headline(), Some(40.0));
    }
}
