//! Analyzer configuration.
//!
//! Every knob has a default matching the conventional firmware layout
//! (`src/`, `test/`, `docs/`, `logs/`), so an empty TOML file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::decode::Encoding;
use crate::error::{GaugeError, Result};
use crate::fs::NamePatterns;

/// File name looked up at the project root when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "fwgauge.toml";

/// Relative weights of the five score sources.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of the architecture score.
    pub architecture: f64,
    /// Weight of the test success rate.
    pub test: f64,
    /// Weight of the build score.
    pub build: f64,
    /// Weight of the code complexity score.
    pub code: f64,
    /// Weight of the documentation score.
    pub docs: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            architecture: 0.30,
            test: 0.25,
            build: 0.20,
            code: 0.15,
            docs: 0.10,
        }
    }
}

impl ScoreWeights {
    fn values(&self) -> [(&'static str, f64); 5] {
        [
            ("architecture", self.architecture),
            ("test", self.test),
            ("build", self.build),
            ("code", self.code),
            ("docs", self.docs),
        ]
    }
}

/// Layer directory names probed by the layer-separation check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerDirs {
    /// Domain layer directory, relative to the source directory.
    pub domain: String,
    /// Application layer directory, relative to the source directory.
    pub application: String,
    /// Infrastructure layer directory, relative to the source directory.
    pub infrastructure: String,
}

impl Default for LayerDirs {
    fn default() -> Self {
        Self {
            domain: "domain".to_string(),
            application: "application".to_string(),
            infrastructure: "infrastructure".to_string(),
        }
    }
}

/// Full analyzer configuration. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Source subtree.
    pub src_dir: PathBuf,
    /// Test subtree.
    pub test_dir: PathBuf,
    /// Documentation subtree.
    pub docs_dir: PathBuf,
    /// Globs for implementation files under `src_dir`.
    pub source_patterns: Vec<String>,
    /// Globs for header files under `src_dir`.
    pub header_patterns: Vec<String>,
    /// Globs for test sources under `test_dir`.
    pub test_patterns: Vec<String>,
    /// Globs for mock files under `test_dir`.
    pub mock_patterns: Vec<String>,
    /// Globs for documentation files under `docs_dir`.
    pub doc_patterns: Vec<String>,
    /// Architectural layer directories.
    pub layer_dirs: LayerDirs,
    /// Test log location.
    pub test_log: PathBuf,
    /// Build log location.
    pub build_log: PathBuf,
    /// Directory receiving the JSON and Markdown artifacts.
    pub output_dir: PathBuf,
    /// Encodings tried in order when decoding logs.
    pub log_encodings: Vec<Encoding>,
    /// Source files above this many lines count as "large".
    pub large_file_lines: usize,
    /// Layer-separation points per layered header.
    pub layer_points_per_file: f64,
    /// Interface-usage points per mock file.
    pub mock_points_per_file: f64,
    /// Documentation points per doc file.
    pub doc_points_per_file: f64,
    /// Documentation score when the docs directory is absent.
    pub docs_baseline_score: f64,
    /// Score source weights.
    pub weights: ScoreWeights,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("src"),
            test_dir: PathBuf::from("test"),
            docs_dir: PathBuf::from("docs"),
            source_patterns: vec!["*.cpp".to_string()],
            header_patterns: vec!["*.h".to_string()],
            test_patterns: vec!["test_*.cpp".to_string()],
            mock_patterns: vec!["Mock*.h".to_string()],
            doc_patterns: vec!["*.md".to_string()],
            layer_dirs: LayerDirs::default(),
            test_log: PathBuf::from("test/logs/test_results_clean.txt"),
            build_log: PathBuf::from("logs/comfile/compile_results.txt"),
            output_dir: PathBuf::from("logs/quality"),
            log_encodings: Encoding::LOG_CHAIN.to_vec(),
            large_file_lines: 200,
            layer_points_per_file: 10.0,
            mock_points_per_file: 15.0,
            doc_points_per_file: 10.0,
            docs_baseline_score: 50.0,
            weights: ScoreWeights::default(),
        }
    }
}

impl MetricsConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path, or from
    /// `<root>/fwgauge.toml` when present, or fall back to defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        log::info!("loading config from {}", path.display());
        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    /// Reject weights and scoring constants that would break the [0,100]
    /// invariant, and make sure every glob compiles.
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.weights.values() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(GaugeError::Config(format!(
                    "weight `{name}` must be a finite non-negative number"
                )));
            }
        }
        let points = [
            ("layer_points_per_file", self.layer_points_per_file),
            ("mock_points_per_file", self.mock_points_per_file),
            ("doc_points_per_file", self.doc_points_per_file),
            ("docs_baseline_score", self.docs_baseline_score),
        ];
        for (name, value) in points {
            if !value.is_finite() || value < 0.0 {
                return Err(GaugeError::Config(format!(
                    "`{name}` must be a finite non-negative number"
                )));
            }
        }
        if self.log_encodings.is_empty() {
            return Err(GaugeError::Config(
                "`log_encodings` must name at least one encoding".to_string(),
            ));
        }
        self.patterns().map(|_| ())
    }

    /// Compile the configured glob groups.
    pub fn patterns(&self) -> Result<CompiledPatterns> {
        Ok(CompiledPatterns {
            source: NamePatterns::new(&self.source_patterns)?,
            header: NamePatterns::new(&self.header_patterns)?,
            test: NamePatterns::new(&self.test_patterns)?,
            mock: NamePatterns::new(&self.mock_patterns)?,
            doc: NamePatterns::new(&self.doc_patterns)?,
        })
    }
}

/// Glob groups compiled from a [`MetricsConfig`].
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    /// Implementation files.
    pub source: NamePatterns,
    /// Header files.
    pub header: NamePatterns,
    /// Test sources.
    pub test: NamePatterns,
    /// Mock headers.
    pub mock: NamePatterns,
    /// Documentation files.
    pub doc: NamePatterns,
}

/// Absolute locations and compiled patterns for one project root.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Project root.
    pub root: PathBuf,
    /// Source subtree.
    pub src_dir: PathBuf,
    /// Test subtree.
    pub test_dir: PathBuf,
    /// Documentation subtree.
    pub docs_dir: PathBuf,
    /// Layer directories in domain, application, infrastructure order.
    pub layer_dirs: [PathBuf; 3],
    /// Test log file.
    pub test_log: PathBuf,
    /// Build log file.
    pub build_log: PathBuf,
    /// Artifact directory.
    pub output_dir: PathBuf,
    /// Compiled file-name globs.
    pub patterns: CompiledPatterns,
}

impl ProjectLayout {
    /// Resolve every configured path against `root`.
    pub fn resolve(root: &Path, config: &MetricsConfig) -> Result<Self> {
        let src_dir = root.join(&config.src_dir);
        let layer_dirs = [
            src_dir.join(&config.layer_dirs.domain),
            src_dir.join(&config.layer_dirs.application),
            src_dir.join(&config.layer_dirs.infrastructure),
        ];
        Ok(Self {
            root: root.to_path_buf(),
            test_dir: root.join(&config.test_dir),
            docs_dir: root.join(&config.docs_dir),
            layer_dirs,
            test_log: root.join(&config.test_log),
            build_log: root.join(&config.build_log),
            output_dir: root.join(&config.output_dir),
            patterns: config.patterns()?,
            src_dir,
        })
    }
}
