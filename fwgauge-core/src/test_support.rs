//! Shared fixtures for unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{MetricsConfig, ProjectLayout};
use crate::error::GaugeError;
use crate::fs::MockFileSystem;

pub(crate) const ROOT: &str = "/fw";

/// Mock filesystem serving an in-memory tree rooted at [`ROOT`].
pub(crate) fn mock_tree(files: &[(&str, &[u8])]) -> MockFileSystem {
    let tree: Arc<BTreeMap<PathBuf, Vec<u8>>> = Arc::new(
        files
            .iter()
            .map(|(rel, bytes)| (Path::new(ROOT).join(rel), bytes.to_vec()))
            .collect(),
    );

    let mut fs = MockFileSystem::new();

    let listing = Arc::clone(&tree);
    fs.expect_list_files().returning(move |dir: &Path| {
        Ok(listing
            .keys()
            .filter(|path| path.starts_with(dir))
            .cloned()
            .collect())
    });

    let reading = Arc::clone(&tree);
    fs.expect_read_bytes().returning(move |path: &Path| {
        reading
            .get(path)
            .cloned()
            .ok_or_else(|| GaugeError::Other(format!("no such file: {}", path.display())))
    });

    let dirs = Arc::clone(&tree);
    fs.expect_is_dir().returning(move |dir: &Path| {
        dirs.keys()
            .any(|path| path.starts_with(dir) && path.as_path() != dir)
    });

    let regular = Arc::clone(&tree);
    fs.expect_is_file()
        .returning(move |path: &Path| regular.contains_key(path));

    fs
}

/// Layout for [`ROOT`] under the default configuration.
pub(crate) fn default_layout() -> ProjectLayout {
    ProjectLayout::resolve(Path::new(ROOT), &MetricsConfig::default()).expect("default layout")
}
