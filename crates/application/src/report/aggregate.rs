//! Cross-model aggregation of collected scores.

use indexmap::IndexMap;
use vlm_bench_domain::{ModelScores, ReportError, TestScores, MEAN_LABEL};

/// Test name -> winning model (`None` when no model has the test)
pub type Winners = IndexMap<String, Option<String>>;

/// Pick the best model for each test.
///
/// Only models with a score for the test compete; the first model in
/// mapping order wins ties.
pub fn best_of_type<S: AsRef<str>>(scores: &TestScores, tests: &[S]) -> Winners {
    tests
        .iter()
        .map(|test| {
            let test = test.as_ref();
            let mut best: Option<(&str, f64)> = None;
            for (model, model_scores) in scores.iter() {
                let Some(&score) = model_scores.get(test) else {
                    continue;
                };
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((model, score));
                }
            }
            (test.to_string(), best.map(|(model, _)| model.to_string()))
        })
        .collect()
}

/// Add `label` to every model as the mean over `tests`.
///
/// The mean is taken over the given tests only, before the new entry is
/// inserted; missing scores count as zero. Does nothing when `tests` is
/// empty.
pub fn augment_with_aggregate<S: AsRef<str>>(scores: &mut TestScores, tests: &[S], label: &str) {
    if tests.is_empty() {
        return;
    }

    let models: Vec<String> = scores.model_names().map(str::to_string).collect();
    for model in models {
        let total: f64 = tests
            .iter()
            .map(|test| scores.score_or_zero(&model, test.as_ref()))
            .sum();
        scores.set(&model, label, total / tests.len() as f64);
    }
}

/// Add the "Mean" column when more than one test type was observed.
///
/// Returns whether the column was added.
pub fn augment_mean<S: AsRef<str>>(scores: &mut TestScores, tests: &[S]) -> bool {
    if tests.len() <= 1 {
        return false;
    }
    augment_with_aggregate(scores, tests, MEAN_LABEL);
    true
}

/// Choose the score each model is plotted with.
///
/// A model with a "Mean" is plotted by it; a model with a single score by
/// that score. All models must agree on the chosen name.
pub fn select_plot_scores(scores: &TestScores) -> Result<(String, ModelScores), ReportError> {
    let mut name: Option<String> = None;
    let mut selected = ModelScores::new();

    for (model, model_scores) in scores.iter() {
        let (candidate, score) = if let Some(&mean) = model_scores.get(MEAN_LABEL) {
            (MEAN_LABEL.to_string(), mean)
        } else if model_scores.len() == 1 {
            let (test, &score) = model_scores
                .first()
                .ok_or(ReportError::NoScores)?;
            (test.clone(), score)
        } else {
            return Err(ReportError::InvalidScoreShape {
                model: model.to_string(),
                tests: model_scores.keys().cloned().collect(),
            });
        };

        match &name {
            Some(expected) if *expected != candidate => {
                return Err(ReportError::InconsistentScores {
                    model: model.to_string(),
                    expected: expected.clone(),
                    found: candidate,
                });
            }
            Some(_) => {}
            None => name = Some(candidate),
        }
        selected.insert(model.to_string(), score);
    }

    name.map(|n| (n, selected)).ok_or(ReportError::NoScores)
}
