//! Per-category precision, recall and F1 for multiple-choice answers.
//!
//! Each row carries its own options list (`"['A. Open door', 'B. Close door']"`).
//! Letters are mapped to the option description and counts are accumulated
//! per description, so the same activity under different letters in
//! different rows pools into one category.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use vlm_bench_domain::{CandidateRow, CategoryMetrics, ConfusionCounts, EvaluationError, ScoreTable};

static QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)""#).expect("Invalid quoted string regex")
});

/// Label of the unweighted-mean row
pub const MEAN_ROW: &str = "mean";

/// Resolve `\'`, `\"` and `\\` inside a quoted option
fn unescape(option: &str) -> String {
    let mut out = String::with_capacity(option.len());
    let mut chars = option.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('\'' | '"' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse an options list into letter -> description.
///
/// Each option is split on its first `.`; both halves are trimmed.
pub fn parse_candidates(candidates: &str) -> Result<IndexMap<String, String>, EvaluationError> {
    let trimmed = candidates.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return Err(EvaluationError::MalformedCandidates(candidates.to_string()));
    }

    let mut options = IndexMap::new();
    for capture in QUOTED.captures_iter(trimmed) {
        let option = unescape(
            capture
                .get(1)
                .or_else(|| capture.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default(),
        );

        let Some((letter, description)) = option.split_once('.') else {
            return Err(EvaluationError::MalformedCandidates(candidates.to_string()));
        };
        options.insert(letter.trim().to_string(), description.trim().to_string());
    }

    Ok(options)
}

fn uppercase_letters(text: &str) -> Vec<char> {
    let mut letters: Vec<char> = Vec::new();
    for c in text.chars().filter(|c| c.is_uppercase()) {
        if !letters.contains(&c) {
            letters.push(c);
        }
    }
    letters
}

/// Category -> counts, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTally {
    counts: IndexMap<String, ConfusionCounts>,
}

impl CategoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    fn category(letter: char, letter_to_desc: &IndexMap<String, String>) -> String {
        let key = letter.to_string();
        match letter_to_desc.get(&key) {
            Some(desc) => desc.clone(),
            None => {
                warn!(letter = %letter, "Letter has no candidate description");
                key
            }
        }
    }

    /// Accumulate one row.
    ///
    /// Every letter seen in either side gets a category, even if it ends up
    /// with all counters at zero.
    pub fn update(&mut self, answer: &str, prediction: &str, letter_to_desc: &IndexMap<String, String>) {
        let truth = uppercase_letters(answer);
        let predicted = uppercase_letters(prediction);

        for &c in truth.iter().chain(predicted.iter()) {
            self.counts
                .entry(Self::category(c, letter_to_desc))
                .or_default();
        }

        for &c in &predicted {
            let counts = self
                .counts
                .entry(Self::category(c, letter_to_desc))
                .or_default();
            if truth.contains(&c) {
                counts.tp += 1;
            } else {
                counts.fp += 1;
            }
        }

        for &c in truth.iter().filter(|c| !predicted.contains(c)) {
            self.counts
                .entry(Self::category(c, letter_to_desc))
                .or_default()
                .fn_ += 1;
        }
    }

    /// Counts of one category
    pub fn get(&self, category: &str) -> Option<&ConfusionCounts> {
        self.counts.get(category)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Metrics per category followed by the unweighted mean row
    pub fn metrics(&self) -> Vec<CategoryMetrics> {
        let mut rows: Vec<CategoryMetrics> = self
            .counts
            .iter()
            .map(|(category, counts)| CategoryMetrics {
                category: category.clone(),
                f1: counts.f1(),
                precision: counts.precision(),
                recall: counts.recall(),
            })
            .collect();

        let n = rows.len() as f64;
        let mean = |f: fn(&CategoryMetrics) -> f64| {
            if rows.is_empty() {
                0.0
            } else {
                rows.iter().map(f).sum::<f64>() / n
            }
        };
        let mean_row = CategoryMetrics {
            category: MEAN_ROW.to_string(),
            f1: mean(|m| m.f1),
            precision: mean(|m| m.precision),
            recall: mean(|m| m.recall),
        };

        rows.push(mean_row);
        rows
    }
}

/// Score a multiple-choice file per category
pub fn score_per_category(rows: &[CandidateRow]) -> Result<ScoreTable, EvaluationError> {
    let mut tally = CategoryTally::new();
    for row in rows {
        let letter_to_desc = parse_candidates(&row.candidates)?;
        tally.update(&row.answer, &row.prediction, &letter_to_desc);
    }
    Ok(ScoreTable::PerCategory(tally.metrics()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(answer: &str, prediction: &str, candidates: &str) -> CandidateRow {
        CandidateRow {
            answer: answer.to_string(),
            candidates: candidates.to_string(),
            prediction: prediction.to_string(),
        }
    }

    const DOORS: &str = "['A. Open door', 'B. Close door']";

    #[test]
    fn test_parse_candidates() {
        let options = parse_candidates("['A. Closing vehicle trunk', \"B. Exiting vehicle\"]").unwrap();
        assert_eq!(options["A"], "Closing vehicle trunk");
        assert_eq!(options["B"], "Exiting vehicle");
        assert_eq!(options.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_parse_candidates_splits_on_first_dot() {
        let options = parse_candidates("['A. Carry obj. to car']").unwrap();
        assert_eq!(options["A"], "Carry obj. to car");
    }

    #[test]
    fn test_parse_candidates_unescapes_quotes() {
        let options =
            parse_candidates(r#"['A. Open driver\'s door', "B. Say \"hi\"", 'C. Back\\slash']"#).unwrap();
        assert_eq!(options["A"], "Open driver's door");
        assert_eq!(options["B"], "Say \"hi\"");
        assert_eq!(options["C"], "Back\\slash");
    }

    #[test]
    fn test_parse_candidates_rejects_malformed() {
        assert!(matches!(
            parse_candidates("A. Open door"),
            Err(EvaluationError::MalformedCandidates(_))
        ));
        assert!(matches!(
            parse_candidates("['no separator']"),
            Err(EvaluationError::MalformedCandidates(_))
        ));
    }

    #[test]
    fn test_wrong_answer_gives_zeros() {
        let table = score_per_category(&[row("A", "B", DOORS)]).unwrap();
        let ScoreTable::PerCategory(metrics) = table else {
            panic!("expected per-category table");
        };

        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0].category, "Open door");
        assert_eq!(metrics[1].category, "Close door");
        assert_eq!(metrics[2].category, MEAN_ROW);
        assert!(metrics.iter().all(|m| m.f1 == 0.0 && m.precision == 0.0 && m.recall == 0.0));
    }

    #[test]
    fn test_counts_across_rows() {
        let mut tally = CategoryTally::new();
        let options = parse_candidates(DOORS).unwrap();
        tally.update("A", "A", &options);
        tally.update("AB", "A", &options);
        tally.update("B", "AB", &options);

        assert_eq!(tally.get("Open door"), Some(&ConfusionCounts { tp: 2, fp: 1, fn_: 0 }));
        assert_eq!(tally.get("Close door"), Some(&ConfusionCounts { tp: 1, fp: 0, fn_: 1 }));

        let metrics = tally.metrics();
        let open = &metrics[0];
        assert!((open.precision - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(open.recall, 1.0);
        let mean = metrics.last().unwrap();
        assert!((mean.recall - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_prediction_only_letter_initialized() {
        let mut tally = CategoryTally::new();
        tally.update("", "B", &parse_candidates(DOORS).unwrap());
        assert_eq!(tally.get("Close door"), Some(&ConfusionCounts { tp: 0, fp: 1, fn_: 0 }));
    }

    #[test]
    fn test_unknown_letter_uses_letter() {
        let mut tally = CategoryTally::new();
        tally.update("C", "C", &parse_candidates(DOORS).unwrap());
        assert_eq!(tally.get("C"), Some(&ConfusionCounts { tp: 1, fp: 0, fn_: 0 }));
    }

    #[test]
    fn test_empty_mean_is_zero() {
        let metrics = CategoryTally::new().metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].f1, 0.0);
    }
}
