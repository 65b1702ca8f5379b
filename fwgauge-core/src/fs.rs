//! Filesystem abstractions used for inspection.

use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use crate::error::{GaugeError, Result};

/// Abstraction over filesystem access for testability.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// List all files reachable from the root path.
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;
    /// Read a file's raw bytes.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;
    /// Whether the path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
    /// Whether the path is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Default filesystem implementation backed by `std::fs` and `walkdir`.
#[derive(Debug, Default, Clone)]
pub struct StdFileSystem;

impl StdFileSystem {
    /// Create a new standard filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(walk_error(err)),
                Err(err) => {
                    log::warn!("skipping unreadable entry under {}: {err}", root.display());
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Compiled set of file-name globs such as `*.cpp` or `Mock*.h`.
///
/// Patterns match against the final path component only.
#[derive(Debug, Clone)]
pub struct NamePatterns {
    set: GlobSet,
}

impl NamePatterns {
    /// Compile a list of glob patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern.as_ref())?);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    /// Whether the file name of `path` matches any pattern.
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.set.is_match(Path::new(name)))
            .unwrap_or(false)
    }
}

/// List every file under `dir`, or nothing when the directory is absent or
/// cannot be listed.
pub fn list_dir<F: FileSystem + ?Sized>(fs: &F, dir: &Path) -> Vec<PathBuf> {
    if !fs.is_dir(dir) {
        log::debug!("directory not found: {}", dir.display());
        return Vec::new();
    }
    fs.list_files(dir).unwrap_or_else(|err| {
        log::warn!("failed to list {}: {err}", dir.display());
        Vec::new()
    })
}

/// List files under `dir` whose names match `patterns`.
pub fn matching_files<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &Path,
    patterns: &NamePatterns,
) -> Vec<PathBuf> {
    list_dir(fs, dir)
        .into_iter()
        .filter(|path| patterns.matches(path))
        .collect()
}

/// Stable `/`-separated key for `path` relative to `root`.
pub fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn walk_error(err: walkdir::Error) -> GaugeError {
    match err.into_io_error() {
        Some(io) => GaugeError::Io(io),
        None => GaugeError::Other("filesystem loop detected".to_string()),
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
