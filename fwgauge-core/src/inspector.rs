//! Source tree inspection: walks the configured subtrees and aggregates
//! per-file extractor output into project-wide code metrics.

use std::path::{Path, PathBuf};

use crate::config::ProjectLayout;
use crate::domain::{CodeMetrics, FileMetrics};
use crate::extractor::extract_bytes;
use crate::fs::{FileSystem, list_dir, matching_files, relative_key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileRole {
    Source,
    Header,
    Test,
}

/// Scan source, header, and test files and sum their metrics.
///
/// Test files are counted and recorded in the breakdown but do not feed the
/// line, function, class, or complexity totals.
pub fn inspect_code<F: FileSystem + ?Sized>(fs: &F, layout: &ProjectLayout) -> CodeMetrics {
    log::info!("collecting code metrics under {}", layout.root.display());
    let mut metrics = CodeMetrics::default();

    for (path, role) in classify_files(fs, layout) {
        let key = relative_key(&layout.root, &path);
        let file_metrics = analyze_file(fs, &path, &key);

        match role {
            FileRole::Source => metrics.source_files += 1,
            FileRole::Header => metrics.header_files += 1,
            FileRole::Test => metrics.test_files += 1,
        }
        if role != FileRole::Test {
            metrics.total_lines += file_metrics.line_count;
            metrics.functions += file_metrics.function_count;
            metrics.classes += file_metrics.class_count;
            metrics.complexity_score += file_metrics.complexity_count;
        }
        metrics.breakdown.insert(key, file_metrics);
    }

    metrics.avg_complexity = average_complexity(metrics.complexity_score, metrics.functions);

    log::info!(
        "scanned {} source, {} header, {} test files",
        metrics.source_files,
        metrics.header_files,
        metrics.test_files
    );
    metrics
}

/// `complexity / functions`, or 0 when there are no functions.
pub fn average_complexity(complexity: usize, functions: usize) -> f64 {
    if functions == 0 {
        return 0.0;
    }
    complexity as f64 / functions as f64
}

fn classify_files<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
) -> Vec<(PathBuf, FileRole)> {
    let patterns = &layout.patterns;
    let mut files: Vec<(PathBuf, FileRole)> = list_dir(fs, &layout.src_dir)
        .into_iter()
        .filter_map(|path| {
            if patterns.source.matches(&path) {
                Some((path, FileRole::Source))
            } else if patterns.header.matches(&path) {
                Some((path, FileRole::Header))
            } else {
                None
            }
        })
        .collect();

    files.extend(
        matching_files(fs, &layout.test_dir, &patterns.test)
            .into_iter()
            .map(|path| (path, FileRole::Test)),
    );
    files
}

fn analyze_file<F: FileSystem + ?Sized>(fs: &F, path: &Path, key: &str) -> FileMetrics {
    match fs.read_bytes(path) {
        Ok(bytes) => extract_bytes(key, &bytes),
        Err(err) => {
            log::warn!("failed to read {}: {err}", path.display());
            FileMetrics::empty(key)
        }
    }
}
