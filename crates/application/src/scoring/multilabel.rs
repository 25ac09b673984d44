//! Pooled multi-label scoring.

use vlm_bench_domain::{ConfusionCounts, MultiLabelRow, ScoreTable};

/// Confusion counts of one row.
///
/// Every character of the answer is a ground-truth label; only uppercase
/// characters of the prediction count as predicted labels. Both sides are
/// treated as sets.
pub fn row_counts(answer: &str, prediction: &str) -> ConfusionCounts {
    let mut truth: Vec<char> = answer.chars().collect();
    truth.sort_unstable();
    truth.dedup();

    let mut predicted: Vec<char> = prediction.chars().filter(|c| c.is_uppercase()).collect();
    predicted.sort_unstable();
    predicted.dedup();

    let tp = predicted.iter().filter(|c| truth.contains(c)).count() as u64;
    ConfusionCounts {
        tp,
        fp: predicted.len() as u64 - tp,
        fn_: truth.len() as u64 - tp,
    }
}

/// Counts pooled over all rows
pub fn pooled_counts(rows: &[MultiLabelRow]) -> ConfusionCounts {
    rows.iter()
        .fold(ConfusionCounts::default(), |mut total, row| {
            total.merge(&row_counts(&row.answer, &row.prediction));
            total
        })
}

/// Global micro F1 over all rows, as a single-row score table
pub fn score_multilabel(rows: &[MultiLabelRow]) -> ScoreTable {
    ScoreTable::MicroF1 {
        f1: pooled_counts(rows).micro_f1(),
    }
}
