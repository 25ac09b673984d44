//! Scoring module - dataset-specific evaluation
//!
//! This module turns prediction files into score tables:
//! pooled multi-label F1, per-category precision/recall/F1 and
//! dimension-wise accuracy rollups.

pub mod dimension;
mod evaluators;
pub mod multilabel;
pub mod per_category;

pub use dimension::{accuracy, rollup, score_dimensions};
pub use evaluators::*;
pub use multilabel::{pooled_counts, row_counts, score_multilabel};
pub use per_category::{parse_candidates, score_per_category, CategoryTally};
