//! Infrastructure layer for VLM Bench
//!
//! This crate provides the filesystem and network adapters:
//! - Score CSV extraction and per-model directory scans
//! - Evaluation-file loading and score-table writing
//! - Scatter-plot rasterization (PNG)
//! - Dataset manifest verification
//! - Markdown report writing
//! - Generation backends (OpenAI-compatible local server)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vlm_bench_infrastructure::score_files::{collect_model_scores, TestNameRule};
//!
//! let scores = collect_model_scores(
//!     Path::new("outputs"),
//!     "InternVL2_5-1B",
//!     TestNameRule::FirstToken,
//!     None,
//! )?;
//! # Ok::<(), vlm_bench_domain::ScoreFileError>(())
//! ```

pub mod dataset_store;
pub mod generation;
pub mod plot;
pub mod report_writer;
pub mod score_files;
pub mod tabular;

// Re-export commonly used types
pub use dataset_store::{manifest_path, prepare_dataset, prepare_descriptor, PreparedDataset};
pub use generation::{GenerationBackend, LocalServerBackend};
pub use plot::{layout_scatter, plot_scatter, LegendEntry, PlotPoint, ScatterPlot};
pub use report_writer::{append_image_link, image_link, write_report, WriteMode};
pub use score_files::{accepted_set, collect_model_scores, extract_score_from_csv, TestNameRule};
pub use tabular::{
    load_rows, score_path, view_file, write_score_table, LineRange, TabularFormat, TabularView,
};
