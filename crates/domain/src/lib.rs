//! VLM Bench Domain Types
//!
//! This crate provides the core value types for the VLM benchmarking harness.
//! Everything here is plain data: no filesystem access, no logging.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **model**: Model and model-family registry used for report rows and plot styling
//! - **scores**: Per-model per-test score maps and scale normalization
//! - **evaluation**: Evaluation rows, confusion counts and score tables
//! - **dataset**: Dataset descriptors and the built-in dataset catalog
//! - **message**: Content items and policy for the model generation interface
//! - **errors**: Error hierarchy with error codes
//!
//! ## Usage
//!
//! ```rust
//! use vlm_bench_domain::{normalize_score, ModelRegistry};
//!
//! // MME-style totals live on a 0-2000 scale
//! assert_eq!(normalize_score(1500.0), 0.75);
//!
//! let registry = ModelRegistry::builtin();
//! let model = registry.model("Qwen2-VL-7B-Instruct").unwrap();
//! assert_eq!(model.base_name, "Qwen2-VL");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dataset;
pub mod errors;
pub mod evaluation;
pub mod message;
pub mod model;
pub mod scores;

pub use dataset::{dataset_catalog, ChecksumAlgorithm, DatasetChecksum, DatasetDescriptor, DatasetKind};
pub use errors::{
    DatasetError, EvaluationError, GenerationError, HarnessError, HarnessResult, PlotError,
    ReportError, ScoreFileError,
};
pub use evaluation::{
    CandidateRow, CategoryMetrics, ConfusionCounts, DimensionAccuracy, DimensionRow,
    MultiLabelRow, ScoreTable,
};
pub use message::{ContentItem, GenerationPolicy};
pub use model::{FamilyStyle, Marker, ModelConfig, ModelRegistry, NamedColor};
pub use scores::{normalize_score, ModelScores, TestScores, AVERAGE_LABEL, MEAN_LABEL};
