//! Metric records produced by each analysis phase.
//!
//! Serialized key names are stable and shared with earlier releases of the
//! metrics JSON, hence the explicit renames.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::decode::Encoding;

/// Lexical metrics for a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    /// Path relative to the project root.
    pub path: String,
    /// Number of lines.
    #[serde(rename = "lines")]
    pub line_count: usize,
    /// Function-like declarations and definitions.
    #[serde(rename = "functions")]
    pub function_count: usize,
    /// Class declarations.
    #[serde(rename = "classes")]
    pub class_count: usize,
    /// Branching keywords (`if`, `for`, `while`, `switch`).
    #[serde(rename = "complexity")]
    pub complexity_count: usize,
}

impl FileMetrics {
    /// Zero metrics for a file that could not be read or decoded.
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Whole-project code tally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMetrics {
    /// Lines across source and header files.
    pub total_lines: usize,
    /// Implementation files scanned.
    pub source_files: usize,
    /// Header files scanned.
    pub header_files: usize,
    /// Test files scanned.
    pub test_files: usize,
    /// Functions across source and header files.
    pub functions: usize,
    /// Classes across source and header files.
    pub classes: usize,
    /// Sum of branching keywords across source and header files.
    pub complexity_score: usize,
    /// `complexity_score / functions`, or 0 without functions.
    pub avg_complexity: f64,
    /// Per-file metrics keyed by relative path.
    #[serde(rename = "files_breakdown")]
    pub breakdown: BTreeMap<String, FileMetrics>,
}

impl CodeMetrics {
    /// Number of files that contributed to the breakdown.
    pub fn scanned_files(&self) -> usize {
        self.source_files + self.header_files + self.test_files
    }
}

/// Headers found in conventional layer directories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerSeparation {
    /// Headers directly under the domain layer.
    pub domain_files: usize,
    /// Headers directly under the application layer.
    pub application_files: usize,
    /// Headers directly under the infrastructure layer.
    pub infrastructure_files: usize,
    /// Sum of the three layers.
    pub total_layered_files: usize,
    /// Sub-score in [0,100].
    pub score: f64,
}

/// Interface/implementation pairing by `I<Name>` convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyInversion {
    /// Headers declaring an `I<Name>` class.
    pub interfaces_count: usize,
    /// Headers declaring a class publicly deriving from an `I<Name>` class.
    pub implementations_count: usize,
    /// File names of interface headers.
    pub interfaces: Vec<String>,
    /// Sub-score in [0,100].
    pub score: f64,
}

/// Mock files under the test tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceUsage {
    /// Number of mock files.
    pub mock_files_count: usize,
    /// Mock file names.
    pub mock_files: Vec<String>,
    /// Sub-score in [0,100].
    pub score: f64,
}

/// A source file above the large-file threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargeFile {
    /// File name.
    pub file: String,
    /// Line count.
    pub lines: usize,
}

/// File-size proxy for single-responsibility adherence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolidPrinciples {
    /// Implementation files considered.
    pub total_source_files: usize,
    /// Files above the threshold.
    pub large_files_count: usize,
    /// The large files themselves.
    pub large_files: Vec<LargeFile>,
    /// Sub-score in [0,100].
    pub score: f64,
}

/// Results of the four architecture checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureMetrics {
    /// Layer directory usage.
    pub layer_separation: LayerSeparation,
    /// Interface naming convention usage.
    pub dependency_inversion: DependencyInversion,
    /// Mock availability.
    pub interface_usage: InterfaceUsage,
    /// File size distribution.
    pub solid_principles: SolidPrinciples,
    /// Mean of the four sub-scores.
    pub architecture_score: f64,
}

/// Outcome of reading a log file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogStatus {
    /// The log was decoded.
    Parsed {
        /// Encoding that decoded the log.
        encoding: Encoding,
    },
    /// The log file does not exist.
    #[default]
    NotFound,
    /// No configured encoding could decode the log.
    Undecodable,
    /// The log exists but reading it failed.
    Unreadable {
        /// Underlying error message.
        message: String,
    },
}

impl LogStatus {
    /// Whether log text was available for parsing.
    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Parsed { .. })
    }
}

/// Which summary line format produced the test counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFormat {
    /// `N Tests N Failures N Ignored`.
    Unity,
    /// `N test cases: N succeeded`.
    TestCases,
    /// `Tests run: N, Failures: N`.
    TestsRun,
    /// `SUMMARY ... N succeeded ... N failed`.
    Summary,
}

/// Test inventory and test-log results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestMetrics {
    /// Test sources found under the test tree.
    pub test_files: usize,
    /// Test cases reported by the log.
    pub test_cases: usize,
    /// Passing test cases.
    pub passed_tests: usize,
    /// Failing test cases.
    pub failed_tests: usize,
    /// `passed / total * 100`, or 0 without tests.
    pub test_success_rate: f64,
    /// Seconds reported by the log.
    pub execution_time: f64,
    /// Test files per source file, as a capped percentage.
    pub coverage_estimate: f64,
    /// How the log was read.
    pub log_status: LogStatus,
    /// Summary line format that matched, if any.
    pub summary_format: Option<SummaryFormat>,
}

impl TestMetrics {
    /// Whether a summary line provided counts.
    pub fn is_measured(&self) -> bool {
        self.summary_format.is_some()
    }
}

/// Build-log results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildMetrics {
    /// Whether the log reports `SUCCESS`.
    pub compilation_success: bool,
    /// RAM usage percentage.
    pub ram_usage_percent: f64,
    /// Flash usage percentage.
    pub flash_usage_percent: f64,
    /// Occurrences of `warning:`.
    pub warnings_count: usize,
    /// Occurrences of `error:`.
    pub errors_count: usize,
    /// How the log was read.
    pub log_status: LogStatus,
}

/// Documentation inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocsMetrics {
    /// Whether the docs directory exists.
    pub docs_dir_present: bool,
    /// Documentation files found.
    pub doc_files: usize,
    /// Sub-score in [0,100].
    pub score: f64,
}

/// One of the five inputs to the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Architecture heuristics.
    Architecture,
    /// Test success rate.
    Test,
    /// Build health.
    Build,
    /// Code complexity.
    Code,
    /// Documentation.
    Docs,
}

impl ScoreSource {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Architecture => "Architecture",
            Self::Test => "Test",
            Self::Build => "Build",
            Self::Code => "Code",
            Self::Docs => "Docs",
        }
    }
}

/// A weighted sub-score that fed the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    /// Which metric group produced the score.
    pub source: ScoreSource,
    /// Sub-score in [0,100].
    pub score: f64,
    /// Relative weight.
    pub weight: f64,
}

/// Complete result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// When the run happened.
    pub timestamp: DateTime<Local>,
    /// Source tally.
    pub code_metrics: CodeMetrics,
    /// Architecture heuristics.
    pub architecture_metrics: ArchitectureMetrics,
    /// Test inventory and log results.
    pub test_metrics: TestMetrics,
    /// Build log results.
    pub build_metrics: BuildMetrics,
    /// Documentation inventory.
    pub docs_metrics: DocsMetrics,
    /// Sub-scores that were available.
    pub score_components: Vec<ScoreComponent>,
    /// Weighted quality score in [0,100].
    pub quality_score: f64,
}
