//! Test inventory and test-log parsing.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::{MetricsConfig, ProjectLayout};
use crate::decode::{DecodeFailure, decode_log, first_success};
use crate::domain::{LogStatus, SummaryFormat, TestMetrics};
use crate::fs::{FileSystem, matching_files};

/// Meaning of the two numeric captures of a summary pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CountLayout {
    /// Group 1 is the total, group 2 the failures.
    TotalFailed,
    /// Group 1 is the total, group 2 the passes.
    TotalPassed,
    /// Group 1 is the passes, group 2 the failures.
    PassedFailed,
}

struct SummaryPattern {
    format: SummaryFormat,
    regex: &'static LazyLock<Regex>,
    layout: CountLayout,
}

static UNITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+) Tests (\d+) Failures (\d+) Ignored").expect("valid unity regex")
});

static TEST_CASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(\d+) test cases: (\d+) succeeded").expect("valid test cases regex")
});

static TESTS_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Tests run: (\d+), Failures: (\d+)").expect("valid tests run regex")
});

static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)SUMMARY.*?\b(\d+) succeeded.*?\b(\d+) failed").expect("valid summary regex")
});

static EXECUTION_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Took (\d+\.\d+) seconds").expect("valid time regex"));

/// Primary format first, then alternates in priority order.
static SUMMARY_PATTERNS: [SummaryPattern; 4] = [
    SummaryPattern {
        format: SummaryFormat::Unity,
        regex: &UNITY,
        layout: CountLayout::TotalFailed,
    },
    SummaryPattern {
        format: SummaryFormat::TestCases,
        regex: &TEST_CASES,
        layout: CountLayout::TotalPassed,
    },
    SummaryPattern {
        format: SummaryFormat::TestsRun,
        regex: &TESTS_RUN,
        layout: CountLayout::TotalFailed,
    },
    SummaryPattern {
        format: SummaryFormat::Summary,
        regex: &SUMMARY,
        layout: CountLayout::PassedFailed,
    },
];

/// Test counts read from a summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSummary {
    /// Which format matched.
    pub format: SummaryFormat,
    /// Total test cases.
    pub total: usize,
    /// Passing test cases.
    pub passed: usize,
    /// Failing test cases.
    pub failed: usize,
}

impl TestSummary {
    /// `passed / total * 100`, or 0 without tests.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.passed as f64 / self.total as f64 * 100.0
    }
}

impl SummaryPattern {
    fn parse(&self, text: &str) -> Option<TestSummary> {
        let captures = self.regex.captures(text)?;
        let first = number(&captures, 1)?;
        let second = number(&captures, 2)?;
        let (total, passed, failed) = match self.layout {
            CountLayout::TotalFailed => {
                let failed = second.min(first);
                (first, first - failed, failed)
            }
            CountLayout::TotalPassed => {
                let passed = second.min(first);
                (first, passed, first - passed)
            }
            CountLayout::PassedFailed => (first.checked_add(second)?, first, second),
        };
        log::debug!("test summary matched {:?}: {total} total", self.format);
        Some(TestSummary {
            format: self.format,
            total,
            passed,
            failed,
        })
    }
}

fn number(captures: &Captures<'_>, group: usize) -> Option<usize> {
    captures.get(group)?.as_str().parse().ok()
}

/// Extract test counts, trying the primary format and then each alternate.
pub fn parse_summary(text: &str) -> Option<TestSummary> {
    first_success(SUMMARY_PATTERNS.iter(), |pattern| pattern.parse(text))
}

/// Extract the `Took N.N seconds` execution time.
pub fn parse_execution_time(text: &str) -> Option<f64> {
    EXECUTION_TIME
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse().ok())
}

/// Count test sources, read the test log, and estimate coverage.
pub fn inspect_tests<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
    config: &MetricsConfig,
) -> TestMetrics {
    log::info!("collecting test metrics");
    let mut metrics = TestMetrics {
        test_files: matching_files(fs, &layout.test_dir, &layout.patterns.test).len(),
        ..TestMetrics::default()
    };

    match decode_log(fs, &layout.test_log, &config.log_encodings) {
        Ok(decoded) => {
            metrics.log_status = LogStatus::Parsed {
                encoding: decoded.encoding,
            };
            apply_log(&mut metrics, &decoded.text);
        }
        Err(failure) => metrics.log_status = failure_status(failure),
    }

    let source_files = matching_files(fs, &layout.src_dir, &layout.patterns.source).len();
    metrics.coverage_estimate = coverage_estimate(metrics.test_files, source_files);
    metrics
}

/// Fold parsed log text into `metrics`.
pub fn apply_log(metrics: &mut TestMetrics, text: &str) {
    match parse_summary(text) {
        Some(summary) => {
            metrics.test_cases = summary.total;
            metrics.passed_tests = summary.passed;
            metrics.failed_tests = summary.failed;
            metrics.test_success_rate = summary.success_rate();
            metrics.summary_format = Some(summary.format);
        }
        None => log::warn!("no test summary found in test log"),
    }
    if let Some(seconds) = parse_execution_time(text) {
        metrics.execution_time = seconds;
    }
}

/// Test files per source file as a percentage capped at 100.
pub fn coverage_estimate(test_files: usize, source_files: usize) -> f64 {
    if test_files == 0 || source_files == 0 {
        return 0.0;
    }
    (test_files as f64 / source_files as f64 * 100.0).min(100.0)
}

pub(crate) fn failure_status(failure: DecodeFailure) -> LogStatus {
    match failure {
        DecodeFailure::NotFound => LogStatus::NotFound,
        DecodeFailure::Undecodable => LogStatus::Undecodable,
        DecodeFailure::Unreadable(message) => LogStatus::Unreadable { message },
    }
}
