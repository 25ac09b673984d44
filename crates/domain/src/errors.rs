//! Error types for the VLM Bench harness.
//!
//! This module defines the error hierarchy shared by every crate in the
//! workspace. Each concern (score files, evaluation, reports, datasets,
//! plots, generation) has its own enum; `HarnessError` unifies them and
//! provides error codes for CLI and JSON output.

use std::path::PathBuf;

/// Top-level harness error type
///
/// This enum encompasses all possible error types that can occur within the
/// harness, providing a unified error handling mechanism.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Score file errors
    #[error("Score file error: {0}")]
    ScoreFile(#[from] ScoreFileError),

    /// Evaluation errors
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Report errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Dataset errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Plot errors
    #[error("Plot error: {0}")]
    Plot(#[from] PlotError),

    /// Generation backend errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarnessError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ScoreFile(_) => "SCORE_FILE_ERROR",
            Self::Evaluation(_) => "EVALUATION_ERROR",
            Self::Report(_) => "REPORT_ERROR",
            Self::Dataset(_) => "DATASET_ERROR",
            Self::Plot(_) => "PLOT_ERROR",
            Self::Generation(_) => "GENERATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error is retryable
    ///
    /// Only transient generation failures are worth retrying; everything
    /// else is a property of the files on disk.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Generation(e) if e.is_retryable())
    }
}

/// Errors reading per-test score CSV files
#[derive(Debug, thiserror::Error)]
pub enum ScoreFileError {
    /// The file or directory could not be read
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The CSV could not be parsed
    #[error("Malformed CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },
}

/// Evaluation-file and scoring errors
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// File extension is not a supported tabular format
    #[error("Unsupported evaluation file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The evaluation file could not be read or written
    #[error("I/O error on {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// A row could not be decoded
    #[error("Failed to parse row {row} of {path}: {message}")]
    Parse { path: PathBuf, row: usize, message: String },

    /// Candidate list is not a list of quoted strings
    #[error("Malformed candidates list: {0}")]
    MalformedCandidates(String),

    /// Composite key lacks the `". "` separator
    #[error("Malformed dimension key (expected 'dimension. task_type'): {0}")]
    MalformedDimensionKey(String),

    /// No evaluator registered for a dataset
    #[error("No evaluator for dataset: {0}")]
    UnknownDataset(String),
}

/// Report aggregation and assembly errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Models disagree on which score should be plotted
    #[error("Inconsistent score names: model {model} has {found}, expected {expected}")]
    InconsistentScores {
        model: String,
        expected: String,
        found: String,
    },

    /// A model carries several scores but no aggregate to plot
    #[error("Invalid test scores for {model}: {tests:?}")]
    InvalidScoreShape { model: String, tests: Vec<String> },

    /// Nothing was collected for any model
    #[error("No scores collected")]
    NoScores,

    /// A rendered markdown table could not be read back
    #[error("Malformed table at line {line}: {message}")]
    MalformedTable { line: usize, message: String },

    /// The report file could not be written
    #[error("Failed to write report {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Dataset availability errors
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Manifest file missing
    #[error("Dataset not found or incomplete. {0} not found")]
    ManifestNotFound(PathBuf),

    /// Manifest checksum mismatch
    #[error("Dataset not found or incomplete. Checksum does not match for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// A media file referenced by the manifest is missing
    #[error("Dataset not found or incomplete. {0} not found")]
    MediaNotFound(String),

    /// Dataset name is not in the catalog
    #[error("Unknown dataset: {0}")]
    Unknown(String),

    /// Manifest could not be read
    #[error("Failed to read manifest {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Scatter-plot errors
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Canvas is too small to hold the plot frame
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// No scores to derive axis bounds from
    #[error("No scores to plot")]
    Empty,

    /// The image could not be saved
    #[error("Failed to save plot {path}: {message}")]
    Save { path: PathBuf, message: String },
}

/// Generation backend errors
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport-level failure
    #[error("Request to {backend} failed: {message}")]
    Request { backend: String, message: String },

    /// Backend answered with a non-success status
    #[error("{backend} returned status {status}: {message}")]
    Status {
        backend: String,
        status: u16,
        message: String,
    },

    /// Call exceeded the configured timeout
    #[error("Timeout waiting for {backend}: {timeout_ms}ms")]
    Timeout { backend: String, timeout_ms: u64 },

    /// Response body could not be decoded
    #[error("Invalid response from {backend}: {message}")]
    InvalidResponse { backend: String, message: String },
}

impl GenerationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse { .. } => false,
        }
    }
}

/// Result type alias for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;
