//! Configuration management for the harness.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. User file `~/.vlm-bench/config.toml`
//! 3. Project file `./vlm-bench.toml` (or an explicit `--config` path)
//! 4. Environment variables with the `VLM_BENCH` prefix and `__` separator
//!
//! ## Example Configuration
//!
//! ```toml
//! [paths]
//! outputs_dir = "outputs"
//! report_dir = "custom/report"
//!
//! [report]
//! custom_tests = ["HICO"]
//!
//! [plot]
//! x_max = 9.0
//! ```
//!
//! Environment example: `VLM_BENCH__GENERATION__RETRY=3`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vlm_bench_domain::GenerationPolicy;

/// Main harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one sub-directory of score CSVs per model
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,

    /// Directory where markdown reports and plots are written
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    /// Root of dataset manifests and media
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
}

/// Report assembly settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Test types reported in their own table by the partitioned report
    #[serde(default = "default_custom_tests")]
    pub custom_tests: Vec<String>,

    /// Report file name (without extension)
    #[serde(default = "default_report_name")]
    pub report_name: String,
}

/// Scatter plot settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Image width in pixels
    #[serde(default = "default_plot_width")]
    pub width: u32,

    /// Image height in pixels
    #[serde(default = "default_plot_height")]
    pub height: u32,

    /// Upper bound of the parameter-count axis (billions)
    #[serde(default = "default_x_max")]
    pub x_max: f64,

    /// Marker radius in pixels
    #[serde(default = "default_marker_size")]
    pub marker_size: u32,
}

/// Generation backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible server
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key sent as a bearer token
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Model name sent with each request
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Retries after the first failed attempt
    #[serde(default = "default_retry")]
    pub retry: u32,

    /// Seconds to wait between attempts
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_outputs_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from("custom/report")
}

fn default_data_root() -> PathBuf {
    if let Ok(root) = std::env::var("LMUData") {
        return PathBuf::from(root);
    }
    dirs::home_dir()
        .map(|home| home.join("LMUData"))
        .unwrap_or_else(|| PathBuf::from("LMUData"))
}

fn default_custom_tests() -> Vec<String> {
    vec!["HICO".to_string()]
}

fn default_report_name() -> String {
    "test_report".to_string()
}

fn default_plot_width() -> u32 {
    1000
}

fn default_plot_height() -> u32 {
    600
}

fn default_x_max() -> f64 {
    9.0
}

fn default_marker_size() -> u32 {
    10
}

fn default_api_base() -> String {
    match std::env::var("OPENAI_API_BASE") {
        Ok(base) if !base.is_empty() => base,
        _ => "http://localhost:8000".to_string(),
    }
}

fn default_api_key() -> String {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => "none".to_string(),
    }
}

fn default_generation_model() -> String {
    "local_server".to_string()
}

fn default_retry() -> u32 {
    5
}

fn default_wait_secs() -> u64 {
    5
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            outputs_dir: default_outputs_dir(),
            report_dir: default_report_dir(),
            data_root: default_data_root(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            custom_tests: default_custom_tests(),
            report_name: default_report_name(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_plot_width(),
            height: default_plot_height(),
            x_max: default_x_max(),
            marker_size: default_marker_size(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: default_api_key(),
            model: default_generation_model(),
            retry: default_retry(),
            wait_secs: default_wait_secs(),
            timeout_secs: default_timeout_secs(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

impl GenerationConfig {
    /// Retry/timeout policy derived from this configuration
    pub fn policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            retry: self.retry,
            wait: Duration::from_secs(self.wait_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl HarnessConfig {
    /// User-level config file path, if a home directory is known
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".vlm-bench").join("config.toml"))
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, using `path` instead of `./vlm-bench.toml` when given
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(user_file) = Self::user_config_file() {
            builder = builder.add_source(config::File::from(user_file).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path.to_path_buf()).required(true)),
            None => builder.add_source(config::File::with_name("vlm-bench").required(false)),
        };

        let config = builder
            .add_source(
                config::Environment::with_prefix("VLM_BENCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("report.custom_tests"),
            )
            .build()
            .context("Failed to build configuration")?;

        let harness_config: HarnessConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        harness_config.validate()?;

        Ok(harness_config)
    }

    /// Parse configuration from a TOML string, on top of the defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: HarnessConfig = toml::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    fn validate(&self) -> Result<()> {
        if self.plot.width < 100 || self.plot.height < 100 {
            anyhow::bail!(
                "Plot size must be at least 100x100, got {}x{}",
                self.plot.width,
                self.plot.height
            );
        }

        if self.plot.x_max <= 0.0 {
            anyhow::bail!("Plot x_max must be positive");
        }

        if self.generation.timeout_secs == 0 {
            anyhow::bail!("Generation timeout must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}
