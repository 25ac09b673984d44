//! Per-test score CSV files.
//!
//! Model outputs are laid out as `{base}/{model}/{model}_{Test}_{suffix}.csv`.
//! Each file holds a header line followed by a data line whose first numeric
//! cell is the test score.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument, warn};
use vlm_bench_domain::{normalize_score, ModelScores, ScoreFileError};

static NUMERIC_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("Invalid numeric cell regex"));

/// How the test name is recovered from a score file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestNameRule {
    /// Every `_`-separated token after the model prefix except the last
    /// (`MMBench_DEV_EN_acc` -> `MMBench_DEV_EN`)
    TrailingSuffix,
    /// Only the first token after the model prefix (`HICO_score` -> `HICO`)
    FirstToken,
}

impl TestNameRule {
    /// Derive the test name from the file stem with the `{model}_` prefix removed.
    ///
    /// Returns `None` when the rule yields an empty name.
    pub fn test_name(&self, rest: &str) -> Option<String> {
        let name = match self {
            Self::TrailingSuffix => match rest.rsplit_once('_') {
                Some((head, _suffix)) => head.to_string(),
                None => String::new(),
            },
            Self::FirstToken => rest.split('_').next().unwrap_or_default().to_string(),
        };

        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// Read the raw score from a score CSV.
///
/// Returns the first cell of the second row that looks like a decimal
/// number, or `None` when the file has fewer than two rows or no such cell.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn extract_score_from_csv(path: &Path) -> Result<Option<f64>, ScoreFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ScoreFileError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut records = reader.records();
    let second = match (records.next(), records.next()) {
        (Some(_), Some(second)) => second.map_err(|e| ScoreFileError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        _ => return Ok(None),
    };

    let score = second
        .iter()
        .find(|cell| NUMERIC_CELL.is_match(cell))
        .and_then(|cell| cell.parse::<f64>().ok());

    Ok(score)
}

/// Collect the normalized scores of one model.
///
/// Scans `{base}/{model}/` in file-name order. When `accepted` is given,
/// only test names contained in it (compared in lowercase) are kept. A
/// missing model directory yields an empty map.
#[instrument(skip(accepted), fields(base = %base.display()))]
pub fn collect_model_scores(
    base: &Path,
    model: &str,
    rule: TestNameRule,
    accepted: Option<&HashSet<String>>,
) -> Result<ModelScores, ScoreFileError> {
    let model_dir = base.join(model);
    let mut scores = ModelScores::new();

    if !model_dir.is_dir() {
        debug!(dir = %model_dir.display(), "No output directory for model");
        return Ok(scores);
    }

    let io_error = |e: std::io::Error| ScoreFileError::Io {
        path: model_dir.clone(),
        message: e.to_string(),
    };

    let mut file_names: Vec<String> = fs::read_dir(&model_dir)
        .map_err(io_error)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    file_names.sort();

    let prefix = format!("{model}_");
    for file_name in file_names {
        let Some(stem) = file_name.strip_suffix(".csv") else {
            continue;
        };
        let Some(rest) = stem.strip_prefix(&prefix) else {
            debug!(file = %file_name, "Skipping file without model prefix");
            continue;
        };
        let Some(test_name) = rule.test_name(rest) else {
            warn!(file = %file_name, "Cannot derive a test name");
            continue;
        };

        if let Some(accepted) = accepted {
            if !accepted.contains(&test_name.to_lowercase()) {
                continue;
            }
        }

        match extract_score_from_csv(&model_dir.join(&file_name))? {
            Some(raw) => {
                let score = normalize_score(raw);
                debug!(test = %test_name, raw, score, "Collected score");
                scores.insert(test_name, score);
            }
            None => debug!(file = %file_name, "No numeric score found"),
        }
    }

    Ok(scores)
}

/// Lowercase a list of test names for use as an accepted set
pub fn accepted_set<S: AsRef<str>>(names: &[S]) -> HashSet<String> {
    names.iter().map(|n| n.as_ref().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_rule_trailing_suffix() {
        let rule = TestNameRule::TrailingSuffix;
        assert_eq!(rule.test_name("MMBench_DEV_EN_acc").as_deref(), Some("MMBench_DEV_EN"));
        assert_eq!(rule.test_name("MME_score").as_deref(), Some("MME"));
        assert_eq!(rule.test_name("MME"), None);
    }

    #[test]
    fn test_rule_first_token() {
        let rule = TestNameRule::FirstToken;
        assert_eq!(rule.test_name("HICO_score").as_deref(), Some("HICO"));
        assert_eq!(rule.test_name("MMBench_DEV_EN_acc").as_deref(), Some("MMBench"));
    }

    #[test]
    fn test_extract_first_numeric_cell() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "split,Overall,AR\nnone,82.5,70\n");
        let score = extract_score_from_csv(&dir.path().join("a.csv")).unwrap();
        assert_eq!(score, Some(82.5));
    }

    #[test]
    fn test_extract_rejects_non_decimal_cells() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "x,y,z\n1e3,.5,-0.25\n");
        let score = extract_score_from_csv(&dir.path().join("a.csv")).unwrap();
        assert_eq!(score, Some(-0.25));
    }

    #[test]
    fn test_extract_single_row_is_none() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "f1\n");
        assert_eq!(extract_score_from_csv(&dir.path().join("a.csv")).unwrap(), None);
    }

    #[test]
    fn test_extract_missing_file_is_io_error() {
        let result = extract_score_from_csv(Path::new("/nonexistent/score.csv"));
        assert!(matches!(result, Err(ScoreFileError::Io { .. })));
    }

    #[test]
    fn test_collect_filters_and_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let model_dir = dir.path().join("InternVL2_5-1B");
        fs::create_dir(&model_dir).unwrap();
        write(&model_dir, "InternVL2_5-1B_MME_score.csv", "perception,total\n1500,1500\n");
        write(&model_dir, "InternVL2_5-1B_MMBench_DEV_EN_acc.csv", "split,Overall\ndev,72.4\n");
        write(&model_dir, "InternVL2_5-1B_POPE_score.csv", "split,Overall\ndev,0.8\n");
        write(&model_dir, "notes.txt", "ignored");
        write(&model_dir, "other_MME_score.csv", "a\n1\n");

        let accepted = accepted_set(&["mme", "MMBench_DEV_EN"]);
        let scores = collect_model_scores(
            dir.path(),
            "InternVL2_5-1B",
            TestNameRule::TrailingSuffix,
            Some(&accepted),
        )
        .unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores["MME"], 0.75);
        assert!((scores["MMBench_DEV_EN"] - 0.724).abs() < 1e-12);
        // sorted file-name order
        assert_eq!(scores.keys().collect::<Vec<_>>(), vec!["MMBench_DEV_EN", "MME"]);
    }

    #[test]
    fn test_collect_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let scores =
            collect_model_scores(dir.path(), "absent", TestNameRule::FirstToken, None).unwrap();
        assert!(scores.is_empty());
    }
}
