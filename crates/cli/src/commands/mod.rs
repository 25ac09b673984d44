//! CLI commands

pub mod catalog;
pub mod evaluate;
pub mod generate;
pub mod report;

use crate::output::OutputFormat;
use vlm_bench_application::ReportAssembler;
use vlm_bench_common::HarnessConfig;
use vlm_bench_domain::ModelRegistry;

/// Context passed to all commands
pub struct CommandContext {
    pub config: HarnessConfig,
    pub registry: ModelRegistry,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a context with the built-in model registry
    pub fn new(config: HarnessConfig, format: OutputFormat) -> Self {
        Self {
            config,
            registry: ModelRegistry::builtin(),
            format,
        }
    }

    /// Report assembler over the configured directories
    pub fn assembler(&self) -> ReportAssembler {
        ReportAssembler::from_config(self.registry.clone(), &self.config)
    }
}
