//! Clean-architecture heuristics.
//!
//! Each check is independent and stateless. A missing directory or an
//! unreadable file degrades that check toward its zero/default score instead
//! of failing the run. Projects without the conventional layer directories
//! score 0 on layer separation whatever their real structure.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{MetricsConfig, ProjectLayout};
use crate::decode::decode_source;
use crate::domain::{
    ArchitectureMetrics, DependencyInversion, InterfaceUsage, LargeFile, LayerSeparation,
    SolidPrinciples,
};
use crate::fs::{FileSystem, matching_files};

static INTERFACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+I[A-Z]\w+").expect("valid interface regex"));

static IMPLEMENTATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+\w+\s*:\s*public\s+I[A-Z]\w+").expect("valid implementation regex")
});

/// Run all four checks and average their scores.
pub fn inspect_architecture<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
    config: &MetricsConfig,
) -> ArchitectureMetrics {
    log::info!("collecting architecture metrics");
    let layer_separation = check_layer_separation(fs, layout, config.layer_points_per_file);
    let dependency_inversion = check_dependency_inversion(fs, layout);
    let interface_usage = check_interface_usage(fs, layout, config.mock_points_per_file);
    let solid_principles = check_solid_principles(fs, layout, config.large_file_lines);

    let architecture_score = mean(&[
        layer_separation.score,
        dependency_inversion.score,
        interface_usage.score,
        solid_principles.score,
    ]);

    ArchitectureMetrics {
        layer_separation,
        dependency_inversion,
        interface_usage,
        solid_principles,
        architecture_score,
    }
}

/// Count headers placed directly in the domain, application, and
/// infrastructure directories.
pub fn check_layer_separation<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
    points_per_file: f64,
) -> LayerSeparation {
    let [domain, application, infrastructure] = layout
        .layer_dirs
        .each_ref()
        .map(|dir| direct_headers(fs, dir, layout).len());
    let total = domain + application + infrastructure;

    LayerSeparation {
        domain_files: domain,
        application_files: application,
        infrastructure_files: infrastructure,
        total_layered_files: total,
        score: capped(total as f64 * points_per_file),
    }
}

/// Compare headers declaring `I<Name>` interfaces with headers declaring
/// classes that publicly derive from one.
pub fn check_dependency_inversion<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
) -> DependencyInversion {
    let mut interfaces = Vec::new();
    let mut implementations_count = 0usize;

    for path in matching_files(fs, &layout.src_dir, &layout.patterns.header) {
        let Some(content) = read_text(fs, &path) else {
            continue;
        };
        if INTERFACE_PATTERN.is_match(&content) {
            interfaces.push(file_name(&path));
        }
        if IMPLEMENTATION_PATTERN.is_match(&content) {
            implementations_count += 1;
        }
    }

    let score = if interfaces.is_empty() {
        0.0
    } else {
        capped(implementations_count as f64 / interfaces.len() as f64 * 100.0)
    };

    DependencyInversion {
        interfaces_count: interfaces.len(),
        implementations_count,
        interfaces,
        score,
    }
}

/// Count mock files anywhere under the test tree.
pub fn check_interface_usage<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
    points_per_file: f64,
) -> InterfaceUsage {
    let mock_files: Vec<String> = matching_files(fs, &layout.test_dir, &layout.patterns.mock)
        .iter()
        .map(|path| file_name(path))
        .collect();

    InterfaceUsage {
        mock_files_count: mock_files.len(),
        score: capped(mock_files.len() as f64 * points_per_file),
        mock_files,
    }
}

/// Score the share of implementation files at or below `threshold` lines.
pub fn check_solid_principles<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
    threshold: usize,
) -> SolidPrinciples {
    let sources = matching_files(fs, &layout.src_dir, &layout.patterns.source);
    let total_source_files = sources.len();

    let large_files: Vec<LargeFile> = sources
        .iter()
        .filter_map(|path| {
            let lines = read_text(fs, path)?.lines().count();
            (lines > threshold).then(|| LargeFile {
                file: file_name(path),
                lines,
            })
        })
        .collect();

    let score = if total_source_files == 0 {
        100.0
    } else {
        let ratio = large_files.len() as f64 / total_source_files as f64;
        capped(100.0 - ratio * 100.0)
    };

    SolidPrinciples {
        total_source_files,
        large_files_count: large_files.len(),
        large_files,
        score,
    }
}

fn direct_headers<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &Path,
    layout: &ProjectLayout,
) -> Vec<PathBuf> {
    matching_files(fs, dir, &layout.patterns.header)
        .into_iter()
        .filter(|path| path.parent() == Some(dir))
        .collect()
}

fn read_text<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Option<String> {
    match fs.read_bytes(path) {
        Ok(bytes) => decode_source(&bytes),
        Err(err) => {
            log::warn!("failed to read {}: {err}", path.display());
            None
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn capped(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
