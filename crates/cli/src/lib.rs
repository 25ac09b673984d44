//! VLM Bench CLI library
//!
//! Command implementations and output formatting for the `vlm-bench`
//! binary.

pub mod commands;
pub mod output;
pub mod progress;

pub use commands::CommandContext;
pub use output::{OutputFormat, TableFormatter};

/// Re-export common types
pub use anyhow::{Context, Result};
