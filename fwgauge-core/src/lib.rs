#![deny(missing_docs)]
//! fwgauge core library.
//!
//! This crate contains the metric records, file scanners, log parsers, and
//! score combinator that power the `fwgauge` firmware quality gauge.

pub mod architecture;
pub mod build_log;
pub mod config;
pub mod decode;
pub mod docs;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod fs;
pub mod inspector;
/// Phase orchestration and artifact output.
pub mod pipeline;
pub mod report;
pub mod score;
pub mod test_log;

#[cfg(test)]
mod test_support;

pub use config::{MetricsConfig, ProjectLayout, ScoreWeights};
pub use decode::Encoding;
pub use domain::{
    ArchitectureMetrics, BuildMetrics, CodeMetrics, DocsMetrics, FileMetrics, LogStatus,
    QualityReport, ScoreComponent, ScoreSource, TestMetrics,
};
pub use error::{GaugeError, Result};
pub use fs::{FileSystem, StdFileSystem};
pub use pipeline::{ArtifactPaths, QualityAnalyzer, write_artifacts};
pub use report::{recommendations, render_json, render_markdown, unmeasured_sources};
