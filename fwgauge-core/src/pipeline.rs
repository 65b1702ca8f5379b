//! End-to-end collection: run every phase in order and assemble the report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::architecture::inspect_architecture;
use crate::build_log::inspect_build;
use crate::config::{MetricsConfig, ProjectLayout};
use crate::docs::inspect_docs;
use crate::domain::QualityReport;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::inspector::inspect_code;
use crate::report::{render_json, render_markdown};
use crate::score::{ScoreInputs, combine, score_components};
use crate::test_log::inspect_tests;

const ARTIFACT_STAMP: &str = "%Y%m%d_%H%M%S";

/// Collects quality metrics for one project root.
pub struct QualityAnalyzer<F: FileSystem> {
    fs: F,
    config: MetricsConfig,
    layout: ProjectLayout,
}

impl<F: FileSystem> QualityAnalyzer<F> {
    /// Validate `config` and resolve its paths against `root`.
    pub fn new(fs: F, root: &Path, config: MetricsConfig) -> Result<Self> {
        config.validate()?;
        let layout = ProjectLayout::resolve(root, &config)?;
        Ok(Self { fs, config, layout })
    }

    /// Resolved project layout.
    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Active configuration.
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Collect a report stamped with the current local time.
    pub fn collect(&self) -> QualityReport {
        self.collect_at(Local::now())
    }

    /// Collect a report stamped with `timestamp`.
    ///
    /// Phases run in a fixed order and never fail: missing inputs surface as
    /// zeroed metrics and skipped score components.
    pub fn collect_at(&self, timestamp: DateTime<Local>) -> QualityReport {
        log::info!("analyzing {}", self.layout.root.display());
        let code_metrics = inspect_code(&self.fs, &self.layout);
        let architecture_metrics = inspect_architecture(&self.fs, &self.layout, &self.config);
        let test_metrics = inspect_tests(&self.fs, &self.layout, &self.config);
        let build_metrics = inspect_build(&self.fs, &self.layout, &self.config);
        let docs_metrics = inspect_docs(&self.fs, &self.layout, &self.config);

        let score_components = score_components(
            ScoreInputs {
                code: &code_metrics,
                architecture: &architecture_metrics,
                test: &test_metrics,
                build: &build_metrics,
                docs: &docs_metrics,
            },
            &self.config.weights,
        );
        let quality_score = combine(&score_components);
        log::info!("quality score {quality_score:.1}/100");

        QualityReport {
            timestamp,
            code_metrics,
            architecture_metrics,
            test_metrics,
            build_metrics,
            docs_metrics,
            score_components,
            quality_score,
        }
    }
}

/// Locations of the two artifacts written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Full metrics as JSON.
    pub metrics_json: PathBuf,
    /// Human-readable Markdown report.
    pub report_markdown: PathBuf,
}

impl ArtifactPaths {
    /// Timestamped artifact names inside `output_dir`.
    pub fn new(output_dir: &Path, timestamp: &DateTime<Local>) -> Self {
        let stamp = timestamp.format(ARTIFACT_STAMP);
        Self {
            metrics_json: output_dir.join(format!("metrics_{stamp}.json")),
            report_markdown: output_dir.join(format!("quality_report_{stamp}.md")),
        }
    }
}

/// Write the JSON and Markdown artifacts, creating `output_dir` if needed.
pub fn write_artifacts(report: &QualityReport, output_dir: &Path) -> Result<ArtifactPaths> {
    let paths = ArtifactPaths::new(output_dir, &report.timestamp);
    std::fs::create_dir_all(output_dir)?;
    std::fs::write(&paths.metrics_json, render_json(report)?)?;
    std::fs::write(&paths.report_markdown, render_markdown(report))?;
    log::info!(
        "wrote {} and {}",
        paths.metrics_json.display(),
        paths.report_markdown.display()
    );
    Ok(paths)
}
