//! Command handlers against temporary outputs.

use vlm_bench_cli::commands::{catalog, evaluate, report, CommandContext};
use vlm_bench_cli::OutputFormat;
use vlm_bench_common::HarnessConfig;
use vlm_bench_testing::{small_registry, DatasetFixture, OutputsFixture};

fn context(outputs: &OutputsFixture, format: OutputFormat) -> CommandContext {
    let mut config = HarnessConfig::default();
    config.paths.outputs_dir = outputs.path().to_path_buf();
    config.paths.report_dir = outputs.report_dir();

    let mut ctx = CommandContext::new(config, format);
    ctx.registry = small_registry();
    ctx
}

#[test]
fn test_standard_report_command() {
    let outputs = OutputsFixture::new();
    outputs.add_score("Alpha-1B", "MME", "score", 1800.0);
    outputs.add_score("Alpha-7B", "MME", "score", 1200.0);

    let ctx = context(&outputs, OutputFormat::Json);
    report::standard(
        &ctx,
        vec!["Alpha".to_string()],
        vec!["MME".to_string()],
        Some("alpha".to_string()),
        true,
    )
    .unwrap();

    assert!(outputs.report_dir().join("alpha.md").is_file());
    assert!(outputs.report_dir().join("MME_score_vs_params.png").is_file());
}

#[test]
fn test_standard_report_unknown_family() {
    let outputs = OutputsFixture::new();
    let ctx = context(&outputs, OutputFormat::Table);
    let err = report::standard(&ctx, vec!["Gamma".to_string()], vec!["MME".to_string()], None, false)
        .unwrap_err();
    assert!(err.to_string().contains("Gamma"));
}

#[test]
fn test_partitioned_report_defaults_to_registry() {
    let outputs = OutputsFixture::new();
    outputs.add_score("Alpha-1B", "MME", "score", 1800.0);
    outputs.add_score("Beta-3B", "HICO", "score", 0.5);

    let ctx = context(&outputs, OutputFormat::Plain);
    report::partitioned(&ctx, vec![], vec![], None).unwrap();

    let text = std::fs::read_to_string(outputs.report_dir().join("test_report.md")).unwrap();
    assert_eq!(text.matches("| Model Name |").count(), 2);
    assert!(text.contains("| Beta-3B | **0.50** |"));
}

#[test]
fn test_scores_command_missing_model_is_not_an_error() {
    let outputs = OutputsFixture::new();
    let ctx = context(&outputs, OutputFormat::Table);
    evaluate::scores(&ctx, "Nobody".to_string(), vec![], false).unwrap();
}

#[test]
fn test_dataset_verify_command() {
    let fixture = DatasetFixture::new("Virat_MCQ", "videos/virat", &["clip_a"], &["clip_a"]);
    let outputs = OutputsFixture::new();
    let mut ctx = context(&outputs, OutputFormat::Json);
    ctx.config.paths.data_root = fixture.root().to_path_buf();

    catalog::verify(&ctx, "Virat_MCQ".to_string()).unwrap();
    assert!(catalog::verify(&ctx, "HICO".to_string()).is_err());
    assert!(catalog::verify(&ctx, "Unknown".to_string()).is_err());
}
