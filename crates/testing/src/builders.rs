//! Fluent builders for score records and model registries.

use vlm_bench_domain::{Marker, ModelRegistry, ModelScores, NamedColor, TestScores};

/// Builder for TestScores instances
#[derive(Clone, Default)]
pub struct TestScoresBuilder {
    scores: TestScores,
}

impl TestScoresBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model with its scores, in the given order
    pub fn with_model(mut self, model: &str, scores: &[(&str, f64)]) -> Self {
        let scores: ModelScores = scores
            .iter()
            .map(|(test, score)| (test.to_string(), *score))
            .collect();
        self.scores.insert_model(model, scores);
        self
    }

    /// Add a model without any score
    pub fn with_empty_model(mut self, model: &str) -> Self {
        self.scores.insert_model(model, ModelScores::new());
        self
    }

    pub fn build(self) -> TestScores {
        self.scores
    }
}

/// Builder for ModelRegistry instances
#[derive(Clone, Default)]
pub struct ModelRegistryBuilder {
    registry: ModelRegistry,
}

impl ModelRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, name: &str, marker: Marker, color: NamedColor) -> Self {
        self.registry.insert_family(name, marker, color);
        self
    }

    pub fn with_model(mut self, name: &str, family: &str, num_params: f64) -> Self {
        self.registry.insert_model(name, family, num_params);
        self
    }

    pub fn build(self) -> ModelRegistry {
        self.registry
    }
}

/// Registry with two small families, enough for report tests
pub fn small_registry() -> ModelRegistry {
    ModelRegistryBuilder::new()
        .with_family("Alpha", Marker::Circle, NamedColor::Blue)
        .with_family("Beta", Marker::Square, NamedColor::Green)
        .with_model("Alpha-1B", "Alpha", 1.0)
        .with_model("Alpha-7B", "Alpha", 7.0)
        .with_model("Beta-3B", "Beta", 3.0)
        .build()
}
