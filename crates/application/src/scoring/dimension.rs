//! Dimension-wise accuracy rollup.
//!
//! Input rows are keyed `"dimension. task_type"`. Besides a per-row
//! accuracy, success/overall counts are summed into a bucket per dimension,
//! a bucket per task type and a global `overall` bucket.

use indexmap::IndexMap;
use vlm_bench_domain::{DimensionAccuracy, DimensionRow, EvaluationError, ScoreTable};

/// Name of the global bucket
pub const OVERALL_BUCKET: &str = "overall";

const KEY_SEPARATOR: &str = ". ";

/// Percentage rounded to two decimals (ties to even), zero when `overall`
/// is zero
pub fn accuracy(success: f64, overall: f64) -> f64 {
    if overall == 0.0 {
        return 0.0;
    }
    (success / overall * 100.0 * 100.0).round_ties_even() / 100.0
}

/// Split a composite key on its first `". "`
pub fn split_key(key: &str) -> Result<(&str, &str), EvaluationError> {
    key.split_once(KEY_SEPARATOR)
        .ok_or_else(|| EvaluationError::MalformedDimensionKey(key.to_string()))
}

/// Original rows with accuracy, followed by one row per bucket in
/// creation order.
pub fn rollup(rows: &[DimensionRow]) -> Result<Vec<DimensionAccuracy>, EvaluationError> {
    let mut buckets: IndexMap<String, (f64, f64)> = IndexMap::new();
    let mut output = Vec::with_capacity(rows.len() + 8);

    for row in rows {
        let (dimension, task_type) = split_key(&row.key)?;

        for bucket in [dimension, task_type, OVERALL_BUCKET] {
            let entry = buckets.entry(bucket.to_string()).or_insert((0.0, 0.0));
            entry.0 += row.success;
            entry.1 += row.overall;
        }

        output.push(DimensionAccuracy {
            key: row.key.clone(),
            success: row.success,
            overall: row.overall,
            acc: accuracy(row.success, row.overall),
        });
    }

    output.extend(
        buckets
            .into_iter()
            .map(|(key, (success, overall))| DimensionAccuracy {
                key,
                success,
                overall,
                acc: accuracy(success, overall),
            }),
    );

    Ok(output)
}

/// Roll up a dimension table into a score table
pub fn score_dimensions(rows: &[DimensionRow]) -> Result<ScoreTable, EvaluationError> {
    rollup(rows).map(ScoreTable::Dimension)
}
