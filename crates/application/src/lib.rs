//! Application layer for VLM Bench
//!
//! This crate holds the harness logic on top of the filesystem and network
//! adapters.
//!
//! ## Modules
//!
//! - `scoring` - Dataset-specific scoring and the evaluator registry
//! - `report` - Score aggregation, markdown tables and report assembly
//! - `generation` - Retry/timeout policy around generation backends

pub mod generation;
pub mod report;
pub mod scoring;

// Re-export commonly used types
pub use generation::RetryingBackend;
pub use report::{
    best_of_type, parse_table, parse_tables, render_table, select_plot_scores,
    PartitionedReportRequest, ReportAssembler, ReportOutcome, StandardReportRequest, Winners,
};
pub use scoring::{
    DatasetEvaluator, EvaluationOutcome, EvaluatorRegistry, ACC_SUFFIX, SCORE_SUFFIX,
};
