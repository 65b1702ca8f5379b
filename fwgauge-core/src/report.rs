//! Report formatting utilities for fwgauge outputs.

use std::fmt::Write;

use serde::Serialize;

use crate::domain::{
    ArchitectureMetrics, BuildMetrics, CodeMetrics, DocsMetrics, LogStatus, QualityReport,
    ScoreSource, TestMetrics,
};

/// Overall score below which a general warning is emitted.
pub const LOW_QUALITY_SCORE: f64 = 70.0;
/// Dependency-inversion score below which more interfaces are suggested.
pub const LOW_DEPENDENCY_INVERSION: f64 = 80.0;
/// Test success rate below which failing tests are flagged.
pub const LOW_TEST_SUCCESS_RATE: f64 = 95.0;
/// RAM usage above which memory optimization is suggested.
pub const HIGH_RAM_USAGE: f64 = 80.0;
/// Average complexity above which refactoring is suggested.
pub const HIGH_AVG_COMPLEXITY: f64 = 10.0;

const ALL_SOURCES: [ScoreSource; 5] = [
    ScoreSource::Architecture,
    ScoreSource::Test,
    ScoreSource::Build,
    ScoreSource::Code,
    ScoreSource::Docs,
];

/// Render a quality report as Markdown.
pub fn render_markdown(report: &QualityReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Firmware Code Quality Report\n");
    let _ = writeln!(
        output,
        "Generated: {}\n",
        report.timestamp.format("%Y-%m-%dT%H:%M:%S")
    );
    let _ = writeln!(
        output,
        "## Overall Quality Score: {:.1}/100\n",
        report.quality_score
    );
    append_score_breakdown(&mut output, report);
    append_code_metrics(&mut output, &report.code_metrics);
    append_architecture_metrics(&mut output, &report.architecture_metrics);
    append_test_metrics(&mut output, &report.test_metrics);
    append_build_metrics(&mut output, &report.build_metrics);
    append_docs_metrics(&mut output, &report.docs_metrics);

    let _ = writeln!(output, "## Recommendations\n");
    let recommendations = recommendations(report);
    if recommendations.is_empty() {
        let _ = writeln!(output, "No recommendations. Keep it up.");
    }
    for item in recommendations {
        let _ = writeln!(output, "- {item}");
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Threshold-triggered suggestions, in a fixed order.
pub fn recommendations(report: &QualityReport) -> Vec<String> {
    let mut items = Vec::new();
    if report.quality_score < LOW_QUALITY_SCORE {
        items.push(format!(
            "Overall quality score is below {LOW_QUALITY_SCORE:.0}. \
             Consider improving architecture and test coverage."
        ));
    }
    if report.architecture_metrics.dependency_inversion.score < LOW_DEPENDENCY_INVERSION {
        items.push("Consider adding more interfaces to improve dependency inversion.".to_string());
    }
    let tests = &report.test_metrics;
    if tests.is_measured() {
        if tests.test_success_rate < LOW_TEST_SUCCESS_RATE {
            items.push(format!(
                "Test success rate is below {LOW_TEST_SUCCESS_RATE:.0}%. Fix failing tests."
            ));
        }
    } else {
        items.push(
            "No test results were found. Run the test suite and capture its log.".to_string(),
        );
    }
    if !report.build_metrics.log_status.is_parsed() {
        items.push(
            "No build log was parsed. Capture the compiler output to track memory usage."
                .to_string(),
        );
    }
    if report.build_metrics.ram_usage_percent > HIGH_RAM_USAGE {
        items.push(format!(
            "RAM usage is high (>{HIGH_RAM_USAGE:.0}%). Consider memory optimization."
        ));
    }
    if report.code_metrics.avg_complexity > HIGH_AVG_COMPLEXITY {
        items.push(
            "Average function complexity is high. Consider refactoring complex functions."
                .to_string(),
        );
    }
    items
}

/// Score sources that were skipped for lack of data, in fixed order.
pub fn unmeasured_sources(report: &QualityReport) -> Vec<ScoreSource> {
    ALL_SOURCES
        .into_iter()
        .filter(|source| {
            !report
                .score_components
                .iter()
                .any(|component| component.source == *source)
        })
        .collect()
}

fn append_score_breakdown(output: &mut String, report: &QualityReport) {
    let _ = writeln!(output, "### Score Breakdown\n");
    let _ = writeln!(output, "| Source | Score | Weight |");
    let _ = writeln!(output, "|---|---|---|");
    for component in &report.score_components {
        let _ = writeln!(
            output,
            "| {} | {:.1} | {:.2} |",
            component.source.label(),
            component.score,
            component.weight
        );
    }
    let missing: Vec<&str> = unmeasured_sources(report)
        .into_iter()
        .map(ScoreSource::label)
        .collect();
    if !missing.is_empty() {
        let _ = writeln!(output, "\nNot measured: {}", missing.join(", "));
    }
    let _ = writeln!(output);
}

fn append_code_metrics(output: &mut String, metrics: &CodeMetrics) {
    let _ = writeln!(output, "### Code Metrics");
    let _ = writeln!(output, "- **Source Files**: {}", metrics.source_files);
    let _ = writeln!(output, "- **Header Files**: {}", metrics.header_files);
    let _ = writeln!(output, "- **Test Files**: {}", metrics.test_files);
    let _ = writeln!(output, "- **Total Lines**: {}", metrics.total_lines);
    let _ = writeln!(output, "- **Functions**: {}", metrics.functions);
    let _ = writeln!(output, "- **Classes**: {}", metrics.classes);
    let _ = writeln!(
        output,
        "- **Average Complexity**: {:.1}\n",
        metrics.avg_complexity
    );
}

fn append_architecture_metrics(output: &mut String, metrics: &ArchitectureMetrics) {
    let layers = &metrics.layer_separation;
    let dip = &metrics.dependency_inversion;
    let usage = &metrics.interface_usage;
    let solid = &metrics.solid_principles;

    let _ = writeln!(
        output,
        "### Architecture Metrics (Score: {:.1}/100)",
        metrics.architecture_score
    );
    let _ = writeln!(output, "- **Layer Separation**: {:.1}/100", layers.score);
    let _ = writeln!(output, "  - Domain files: {}", layers.domain_files);
    let _ = writeln!(output, "  - Application files: {}", layers.application_files);
    let _ = writeln!(
        output,
        "  - Infrastructure files: {}",
        layers.infrastructure_files
    );
    let _ = writeln!(output, "- **Dependency Inversion**: {:.1}/100", dip.score);
    let _ = writeln!(output, "  - Interfaces: {}", dip.interfaces_count);
    let _ = writeln!(output, "  - Implementations: {}", dip.implementations_count);
    let _ = writeln!(output, "- **Interface Usage**: {:.1}/100", usage.score);
    let _ = writeln!(output, "  - Mock files: {}", usage.mock_files_count);
    let _ = writeln!(output, "- **SOLID Principles**: {:.1}/100", solid.score);
    let _ = writeln!(output, "  - Source files: {}", solid.total_source_files);
    let _ = writeln!(output, "  - Large files: {}", solid.large_files_count);
    for large in &solid.large_files {
        let _ = writeln!(output, "    - {} ({} lines)", large.file, large.lines);
    }
    let _ = writeln!(output);
}

fn append_test_metrics(output: &mut String, metrics: &TestMetrics) {
    let _ = writeln!(output, "### Test Metrics");
    append_log_status(output, "Test log", &metrics.log_status);
    let _ = writeln!(output, "- **Test Files**: {}", metrics.test_files);
    let _ = writeln!(output, "- **Test Cases**: {}", metrics.test_cases);
    let _ = writeln!(output, "- **Passed**: {}", metrics.passed_tests);
    let _ = writeln!(output, "- **Failed**: {}", metrics.failed_tests);
    let _ = writeln!(
        output,
        "- **Success Rate**: {:.1}%",
        metrics.test_success_rate
    );
    let _ = writeln!(
        output,
        "- **Execution Time**: {:.3}s",
        metrics.execution_time
    );
    let _ = writeln!(
        output,
        "- **Coverage Estimate**: {:.1}%\n",
        metrics.coverage_estimate
    );
}

fn append_build_metrics(output: &mut String, metrics: &BuildMetrics) {
    let _ = writeln!(output, "### Build Metrics");
    append_log_status(output, "Build log", &metrics.log_status);
    let compilation = if metrics.compilation_success {
        "Success"
    } else {
        "Failed"
    };
    let _ = writeln!(output, "- **Compilation**: {compilation}");
    let _ = writeln!(output, "- **RAM Usage**: {:.1}%", metrics.ram_usage_percent);
    let _ = writeln!(
        output,
        "- **Flash Usage**: {:.1}%",
        metrics.flash_usage_percent
    );
    let _ = writeln!(output, "- **Warnings**: {}", metrics.warnings_count);
    let _ = writeln!(output, "- **Errors**: {}\n", metrics.errors_count);
}

fn append_docs_metrics(output: &mut String, metrics: &DocsMetrics) {
    let _ = writeln!(output, "### Documentation (Score: {:.1}/100)", metrics.score);
    if metrics.docs_dir_present {
        let _ = writeln!(output, "- **Doc Files**: {}\n", metrics.doc_files);
    } else {
        let _ = writeln!(output, "- Docs directory not found.\n");
    }
}

fn append_log_status(output: &mut String, title: &str, status: &LogStatus) {
    match status {
        LogStatus::Parsed { encoding } => {
            let _ = writeln!(output, "- {title}: parsed ({})", encoding.label());
        }
        LogStatus::NotFound => {
            let _ = writeln!(output, "- {title}: not found");
        }
        LogStatus::Undecodable => {
            let _ = writeln!(output, "- {title}: could not be decoded");
        }
        LogStatus::Unreadable { message } => {
            let _ = writeln!(output, "- {title}: unreadable ({message})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Encoding;
    use crate::domain::{LargeFile, ScoreComponent, SummaryFormat};
    use chrono::{Local, TimeZone};

    fn sample_report() -> QualityReport {
        let mut report = QualityReport {
            timestamp: Local
                .with_ymd_and_hms(2026, 10, 19, 8, 30, 0)
                .single()
                .expect("timestamp"),
            code_metrics: CodeMetrics::default(),
            architecture_metrics: ArchitectureMetrics::default(),
            test_metrics: TestMetrics::default(),
            build_metrics: BuildMetrics::default(),
            docs_metrics: DocsMetrics::default(),
            score_components: vec![
                ScoreComponent {
                    source: ScoreSource::Architecture,
                    score: 62.5,
                    weight: 0.30,
                },
                ScoreComponent {
                    source: ScoreSource::Docs,
                    score: 50.0,
                    weight: 0.10,
                },
            ],
            quality_score: 59.375,
        };
        report.code_metrics.source_files = 4;
        report.code_metrics.avg_complexity = 12.0;
        report.architecture_metrics.architecture_score = 62.5;
        report.architecture_metrics.solid_principles.large_files = vec![LargeFile {
            file: "MenuController.cpp".to_string(),
            lines: 412,
        }];
        report.build_metrics.ram_usage_percent = 85.0;
        report
    }

    #[test]
    fn renders_markdown_sections() {
        let output = render_markdown(&sample_report());
        assert!(output.contains("# Firmware Code Quality Report"));
        assert!(output.contains("Generated: 2026-10-19T08:30:00"));
        assert!(output.contains("## Overall Quality Score: 59.4/100"));
        assert!(output.contains("| Architecture | 62.5 | 0.30 |"));
        assert!(output.contains("Not measured: Test, Build, Code"));
        assert!(output.contains("- **Source Files**: 4"));
        assert!(output.contains("MenuController.cpp (412 lines)"));
        assert!(output.contains("- Test log: not found"));
        assert!(output.contains("- Docs directory not found."));
    }

    #[test]
    fn recommendations_follow_thresholds() {
        let items = recommendations(&sample_report());
        assert!(items.iter().any(|item| item.contains("below 70")));
        assert!(items.iter().any(|item| item.contains("dependency inversion")));
        assert!(items.iter().any(|item| item.contains("No test results")));
        assert!(items.iter().any(|item| item.contains("No build log")));
        assert!(items.iter().any(|item| item.contains("RAM usage is high")));
        assert!(items.iter().any(|item| item.contains("complexity is high")));
    }

    #[test]
    fn healthy_report_has_no_recommendations() {
        let mut report = sample_report();
        report.quality_score = 90.0;
        report.architecture_metrics.dependency_inversion.score = 100.0;
        report.test_metrics.summary_format = Some(SummaryFormat::Unity);
        report.test_metrics.test_success_rate = 100.0;
        report.build_metrics.log_status = LogStatus::Parsed {
            encoding: Encoding::Utf8,
        };
        report.build_metrics.ram_usage_percent = 40.0;
        report.code_metrics.avg_complexity = 2.0;

        assert!(recommendations(&report).is_empty());
        assert!(render_markdown(&report).contains("No recommendations."));
    }

    #[test]
    fn failing_tests_are_flagged() {
        let mut report = sample_report();
        report.test_metrics.summary_format = Some(SummaryFormat::TestsRun);
        report.test_metrics.test_success_rate = 80.0;
        let items = recommendations(&report);
        assert!(items.iter().any(|item| item.contains("below 95%")));
        assert!(!items.iter().any(|item| item.contains("No test results")));
    }

    #[test]
    fn renders_json_payload() {
        let json = render_json(&sample_report()).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed["quality_score"], 59.375);
        assert_eq!(parsed["code_metrics"]["source_files"], 4);
        assert_eq!(parsed["test_metrics"]["log_status"]["status"], "not_found");
        assert_eq!(parsed["score_components"][0]["source"], "architecture");
    }
}
