#![deny(missing_docs)]
//! fwgauge command-line interface.
//!
//! Collects quality metrics for a firmware project tree, writes timestamped
//! JSON and Markdown artifacts, and prints a report to stdout.

use clap::{Parser, ValueEnum};
use fwgauge_core::{
    MetricsConfig, QualityAnalyzer, QualityReport, StdFileSystem, recommendations, render_json,
    render_markdown, unmeasured_sources, write_artifacts,
};
use std::fmt::Write;
use std::path::PathBuf;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "fwgauge", version, about = "Firmware project quality gauge")]
struct Cli {
    /// Project root to analyze.
    #[arg(long, env = "FWGAUGE_ROOT", default_value = ".")]
    root: PathBuf,
    /// TOML configuration file (defaults to <root>/fwgauge.toml when present).
    #[arg(long, env = "FWGAUGE_CONFIG")]
    config: Option<PathBuf>,
    /// Directory for the metrics and report artifacts.
    #[arg(long = "output-dir")]
    output_dir: Option<PathBuf>,
    /// Format printed to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
    /// Skip writing artifacts.
    #[arg(long = "no-write")]
    no_write: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[cfg(not(test))]
fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let contents = run(&cli)?;
    print!("{contents}");
    Ok(())
}

#[cfg(test)]
fn main() {}

/// Collect the report, write artifacts unless disabled, and return the
/// stdout rendering.
fn run(cli: &Cli) -> CliResult<String> {
    if !cli.root.is_dir() {
        return Err(format!("project root {} is not a directory", cli.root.display()).into());
    }
    let config = MetricsConfig::load(&cli.root, cli.config.as_deref())?;
    let analyzer = QualityAnalyzer::new(StdFileSystem::new(), &cli.root, config)?;
    let report = analyzer.collect();

    if cli.no_write {
        log::info!("skipping artifact writes");
    } else {
        let output_dir = cli
            .output_dir
            .clone()
            .unwrap_or_else(|| analyzer.layout().output_dir.clone());
        write_artifacts(&report, &output_dir)?;
    }

    render(&report, cli.format)
}

fn render(report: &QualityReport, format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Json => render_json(report)?,
    })
}

fn render_text(report: &QualityReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Quality score: {:.1}/100", report.quality_score);
    for component in &report.score_components {
        let _ = writeln!(
            output,
            "- {}: {:.1} (weight {:.2})",
            component.source.label(),
            component.score,
            component.weight
        );
    }
    let skipped = unmeasured_sources(report);
    if !skipped.is_empty() {
        let labels: Vec<&str> = skipped.iter().map(|source| source.label()).collect();
        let _ = writeln!(output, "Not measured: {}", labels.join(", "));
    }

    let code = &report.code_metrics;
    let _ = writeln!(
        output,
        "Files: {} source, {} header, {} test ({} lines)",
        code.source_files, code.header_files, code.test_files, code.total_lines
    );
    let tests = &report.test_metrics;
    if tests.is_measured() {
        let _ = writeln!(
            output,
            "Tests: {}/{} passed ({:.1}%)",
            tests.passed_tests, tests.test_cases, tests.test_success_rate
        );
    } else {
        let _ = writeln!(output, "Tests: no results");
    }

    let items = recommendations(report);
    if items.is_empty() {
        let _ = writeln!(output, "Recommendations: none");
    } else {
        let _ = writeln!(output, "Recommendations:");
        for item in items {
            let _ = writeln!(output, "- {item}");
        }
    }
    output
}
