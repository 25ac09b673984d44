//! Testing utilities for VLM Bench
//!
//! This crate provides:
//! - Temporary outputs directories laid out like real model runs
//! - Evaluation-file and dataset-manifest fixtures
//! - Builders for score records and model registries
//! - A scripted generation backend
//!
//! # Examples
//!
//! ```
//! use vlm_bench_testing::OutputsFixture;
//!
//! let outputs = OutputsFixture::new();
//! outputs.add_score("InternVL2_5-1B", "MME", "score", 1800.0);
//! assert!(outputs.model_dir("InternVL2_5-1B").exists());
//! ```

pub mod builders;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use proptest;
pub use tempfile;
pub use wiremock;
