//! JWalk-based directory scanner.

use std::path::{Path, PathBuf};
use std::io;
use std::time::{Duration, Instant, SystemTime};

use indexmap::IndexMap;
use jwalk::{Parallelism, WalkDir};
use tracing::{debug, warn};

use twinsync_core::{FileEntry, Result, ScanWarning, SyncError};

/// Summary statistics for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories (root excluded).
    pub total_dirs: u64,
    /// Total size in bytes.
    pub total_size: u64,
    /// Wall time spent scanning.
    pub duration: Duration,
}

/// Result of scanning one root.
#[derive(Debug, Clone)]
pub struct ScannedTree {
    /// Canonical root path that was scanned.
    pub root: PathBuf,
    /// Files keyed by relative path, in path order.
    pub files: IndexMap<PathBuf, FileEntry>,
    /// Relative directory paths, in path order.
    pub directories: Vec<PathBuf>,
    /// Non-fatal problems encountered.
    pub warnings: Vec<ScanWarning>,
    pub stats: ScanStats,
}

impl ScannedTree {
    /// Look up a file by relative path.
    pub fn file(&self, relative: &Path) -> Option<&FileEntry> {
        self.files.get(relative)
    }

    /// Whether a directory exists at `relative`.
    pub fn has_directory(&self, relative: &Path) -> bool {
        self.directories.binary_search_by(|d| d.as_path().cmp(relative)).is_ok()
    }

    /// Iterate over file entries in path order.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values()
    }
}

/// Sequential recursive scanner.
///
/// Symbolic links are never followed; each one is skipped and reported as a
/// warning so cycles cannot occur.
#[derive(Debug, Default, Clone)]
pub struct TreeScanner;

impl TreeScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RootNotFound`] when `root` is missing or is not a
    /// directory.
    pub fn scan(&self, root: &Path) -> Result<ScannedTree> {
        let start = Instant::now();
        let root_path = root.canonicalize().map_err(|_| SyncError::RootNotFound {
            path: root.to_path_buf(),
        })?;
        if !root_path.is_dir() {
            return Err(SyncError::RootNotFound { path: root_path });
        }

        let walker = WalkDir::new(&root_path)
            .parallelism(Parallelism::Serial)
            .skip_hidden(false)
            .follow_links(false)
            .sort(true)
            .min_depth(1);

        let mut files = IndexMap::new();
        let mut directories = Vec::new();
        let mut warnings = Vec::new();
        let mut stats = ScanStats::default();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    warnings.push(match err.io_error() {
                        Some(io) => ScanWarning::read_error(path, io),
                        None => ScanWarning::new(
                            path,
                            err.to_string(),
                            twinsync_core::WarningKind::ReadError,
                        ),
                    });
                    continue;
                }
            };

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(&root_path).map(Path::to_path_buf) else {
                continue;
            };
            let file_type = entry.file_type();

            if file_type.is_symlink() {
                warnings.push(ScanWarning::symlink_skipped(&path));
            } else if file_type.is_dir() {
                stats.total_dirs += 1;
                directories.push(relative);
            } else if file_type.is_file() {
                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(err) => {
                        warnings.push(ScanWarning::new(
                            &path,
                            err.to_string(),
                            twinsync_core::WarningKind::MetadataError,
                        ));
                        continue;
                    }
                };
                match file_entry(path, relative, metadata.len(), metadata.modified()) {
                    Ok(file) => {
                        stats.total_files += 1;
                        stats.total_size += file.size;
                        files.insert(file.relative_path.clone(), file);
                    }
                    Err(warning) => warnings.push(warning),
                }
            }
        }

        // jwalk sorts per directory; a global sort keeps lookups simple.
        directories.sort();
        files.sort_keys();

        for warning in &warnings {
            warn!(path = %warning.path.display(), "{}", warning.message);
        }

        stats.duration = start.elapsed();
        debug!(
            root = %root_path.display(),
            files = stats.total_files,
            dirs = stats.total_dirs,
            bytes = stats.total_size,
            "scan complete"
        );

        Ok(ScannedTree {
            root: root_path,
            files,
            directories,
            warnings,
            stats,
        })
    }
}

/// A file without a readable modification time cannot be compared.
fn file_entry(
    path: PathBuf,
    relative: PathBuf,
    size: u64,
    modified: io::Result<SystemTime>,
) -> std::result::Result<FileEntry, ScanWarning> {
    match modified {
        Ok(modified) => Ok(FileEntry::new(path, relative, size, modified)),
        Err(err) => Err(ScanWarning::new(
            path,
            err.to_string(),
            twinsync_core::WarningKind::MetadataError,
        )),
    }
}
