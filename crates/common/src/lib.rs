//! Common utilities and shared functionality for the VLM Bench harness.
//!
//! This crate provides foundational utilities used across the workspace:
//! - Configuration management
//! - Telemetry (structured logging)
//! - Retry logic for generation calls
//! - Checksum computation for dataset manifests

pub mod checksum;
pub mod config;
pub mod retry;
pub mod telemetry;

// Re-export commonly used types
pub use checksum::ChecksumVerifier;
pub use config::{
    GenerationConfig, HarnessConfig, PathsConfig, PlotConfig, ReportConfig, TelemetryConfig,
};
pub use retry::{retry_with_predicate, RetryConfig};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
