//! Documentation inventory.

use crate::config::{MetricsConfig, ProjectLayout};
use crate::domain::DocsMetrics;
use crate::fs::{FileSystem, matching_files};

/// Count documentation files. Without a docs directory the score falls back
/// to the configured baseline.
pub fn inspect_docs<F: FileSystem + ?Sized>(
    fs: &F,
    layout: &ProjectLayout,
    config: &MetricsConfig,
) -> DocsMetrics {
    let docs_dir_present = fs.is_dir(&layout.docs_dir);
    if !docs_dir_present {
        return DocsMetrics {
            docs_dir_present,
            doc_files: 0,
            score: config.docs_baseline_score.clamp(0.0, 100.0),
        };
    }

    let doc_files = matching_files(fs, &layout.docs_dir, &layout.patterns.doc).len();
    DocsMetrics {
        docs_dir_present,
        doc_files,
        score: (doc_files as f64 * config.doc_points_per_file).clamp(0.0, 100.0),
    }
}
