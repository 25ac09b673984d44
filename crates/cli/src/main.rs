//! VLM Bench CLI
//!
//! Command-line interface for scoring model outputs, building comparison
//! reports and checking datasets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use vlm_bench_cli::commands::{catalog, evaluate, generate, report, CommandContext};
use vlm_bench_cli::output::OutputFormat;
use vlm_bench_common::{init_tracing, HarnessConfig};
use vlm_bench_infrastructure::LineRange;

/// Output format for CLI commands
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum CliOutputFormat {
    /// JSON output
    Json,
    /// Table output (default)
    #[default]
    Table,
    /// Plain text output
    Plain,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "vlm-bench")]
#[command(author, version, about = "Vision-language model benchmarking harness")]
#[command(long_about = "Command-line interface for the VLM benchmarking harness.\n\n\
    Score prediction files, collect per-test scores, and build markdown comparison reports with score-vs-parameter plots.")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value = "table")]
    format: CliOutputFormat,

    /// Configuration file (defaults to ./vlm-bench.toml)
    #[arg(short, long, global = true, env = "VLM_BENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build markdown comparison reports
    #[command(alias = "r")]
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },

    /// Score an evaluation file with its dataset's evaluator
    #[command(alias = "eval")]
    Evaluate {
        /// Dataset name (e.g. HICO, Virat_MCQ, TempCompass)
        #[arg(value_name = "DATASET")]
        dataset: String,

        /// Prediction file (csv, tsv, json or jsonl)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show the normalized scores collected for a model
    Scores {
        /// Model name (output directory name)
        #[arg(value_name = "MODEL")]
        model: String,

        /// Only keep these tests (case-insensitive)
        #[arg(short, long, num_args = 1..)]
        data: Vec<String>,

        /// Take the test name from the first token after the model prefix
        #[arg(long)]
        first_token: bool,
    },

    /// Print a tabular file
    View {
        /// File to print
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Lines to keep: `N`, `A-B` or `A:B` (line 0 is the header)
        #[arg(short, long, value_parser = parse_line_range)]
        lines: Option<LineRange>,
    },

    /// List registered models
    Models,

    /// List known datasets
    Datasets,

    /// Dataset commands
    Dataset {
        #[command(subcommand)]
        command: DatasetCommands,
    },

    /// Send a prompt to the configured generation backend
    Generate {
        /// Prompt text
        #[arg(short, long)]
        text: Option<String>,

        /// Image paths or URLs
        #[arg(long = "image", num_args = 1..)]
        images: Vec<String>,

        /// Video paths or URLs
        #[arg(long = "video", num_args = 1..)]
        videos: Vec<String>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommands {
    /// Combined report over model families, appended to the report file
    Standard {
        /// Model families to include
        #[arg(short, long, num_args = 1.., required = true)]
        families: Vec<String>,

        /// Tests to include (case-insensitive)
        #[arg(short, long, num_args = 1.., required = true)]
        data: Vec<String>,

        /// Report name (defaults to the configured one)
        #[arg(short, long)]
        report_name: Option<String>,

        /// Replace the report instead of appending to it
        #[arg(long)]
        overwrite: bool,
    },

    /// Report with standard tests plus a table of custom tests
    Partitioned {
        /// Models to include (defaults to every registered model)
        #[arg(short, long, num_args = 1..)]
        models: Vec<String>,

        /// Tests reported in their own table (defaults to the configured ones)
        #[arg(long, num_args = 1..)]
        custom: Vec<String>,

        /// Report name (defaults to the configured one)
        #[arg(short, long)]
        report_name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DatasetCommands {
    /// Check that a dataset manifest and its media are present
    Verify {
        /// Dataset name
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the user configuration file path
    Path,
}

fn parse_line_range(s: &str) -> Result<LineRange, String> {
    s.parse()
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "vlm-bench", &mut std::io::stdout());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let log_level = if cli.verbose { "debug" } else { "warn" };
    init_tracing(false, log_level)?;

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let config = HarnessConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    let ctx = CommandContext::new(config, cli.format.into());

    let result = match cli.command {
        Commands::Report { command } => match command {
            ReportCommands::Standard {
                families,
                data,
                report_name,
                overwrite,
            } => report::standard(&ctx, families, data, report_name, overwrite),
            ReportCommands::Partitioned {
                models,
                custom,
                report_name,
            } => report::partitioned(&ctx, models, custom, report_name),
        },

        Commands::Evaluate { dataset, file } => evaluate::evaluate(&ctx, dataset, file),

        Commands::Scores {
            model,
            data,
            first_token,
        } => evaluate::scores(&ctx, model, data, first_token),

        Commands::View { file, lines } => evaluate::view(&ctx, file, lines),

        Commands::Models => catalog::models(&ctx),

        Commands::Datasets => catalog::datasets(&ctx),

        Commands::Dataset { command } => match command {
            DatasetCommands::Verify { name } => catalog::verify(&ctx, name),
        },

        Commands::Generate {
            text,
            images,
            videos,
        } => generate::generate(&ctx, text, images, videos).await,

        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => ctx
                .config
                .to_toml()
                .map(|toml| println!("{toml}")),
            Some(ConfigCommands::Path) => {
                match HarnessConfig::user_config_file() {
                    Some(path) => println!("{}", path.display()),
                    None => println!("(no home directory)"),
                }
                Ok(())
            }
        },

        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        use colored::Colorize;
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if cli.verbose {
            eprintln!("\n{}", "Backtrace:".dimmed());
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}
