//! Folder and file delta computation.
//!
//! Equality policy for a pair of same-path files:
//! 1. With hashing enabled and both sizes at or under the threshold, compare
//!    BLAKE3 digests.
//! 2. Otherwise compare size and whole-second modification time.
//!
//! The threshold is inclusive and evaluated against each side, so a file of
//! exactly `hash_threshold` bytes is still hashed.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use tracing::{debug, info};

use twinsync_core::{
    DeltaRow, Direction, ExtensionFilter, FileEntry, FolderDelta, PhaseDelta, Result, SyncConfig,
    DEFAULT_HASH_THRESHOLD,
};
use twinsync_scan::{ScannedTree, TreeScanner};

use crate::hash::hash_file;

const REASON_HASH: &str = "hashes differ";
const REASON_SIZE_TIME: &str = "size/timestamp differ";
const LARGE_FILE_NOTE: &str = " (large file: hash skipped)";

/// Options controlling the equality policy.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct DeltaOptions {
    /// Compare by digest where sizes allow.
    #[builder(default = "true")]
    pub check_hash: bool,

    /// Largest size, in bytes, that is still hashed.
    #[builder(default = "DEFAULT_HASH_THRESHOLD")]
    pub hash_threshold: u64,

    /// Which files take part at all.
    #[builder(default)]
    pub filter: ExtensionFilter,
}

impl Default for DeltaOptions {
    fn default() -> Self {
        Self {
            check_hash: true,
            hash_threshold: DEFAULT_HASH_THRESHOLD,
            filter: ExtensionFilter::default(),
        }
    }
}

impl DeltaOptions {
    /// Create a new options builder.
    pub fn builder() -> DeltaOptionsBuilder {
        DeltaOptionsBuilder::default()
    }

    /// Whether a file of `size` bytes may be hashed.
    pub fn hashable(&self, size: u64) -> bool {
        self.check_hash && size <= self.hash_threshold
    }
}

impl From<&SyncConfig> for DeltaOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            check_hash: config.check_hash,
            hash_threshold: config.hash_threshold,
            filter: config.extension_filter(),
        }
    }
}

/// Computes what differs between a "from" root and a "to" root.
#[derive(Debug, Clone, Default)]
pub struct DeltaEngine {
    options: DeltaOptions,
    scanner: TreeScanner,
}

impl DeltaEngine {
    /// Create an engine with the given options.
    pub fn new(options: DeltaOptions) -> Self {
        Self {
            options,
            scanner: TreeScanner::new(),
        }
    }

    pub fn options(&self) -> &DeltaOptions {
        &self.options
    }

    /// Directories under `from_root` with no counterpart under `to_root`.
    ///
    /// # Errors
    ///
    /// Fails if either root cannot be scanned.
    pub fn compute_folder_delta(&self, from_root: &Path, to_root: &Path) -> Result<FolderDelta> {
        let from = self.scanner.scan(from_root)?;
        let to = self.scanner.scan(to_root)?;
        Ok(folder_delta(&from, &to))
    }

    /// File rows for copying `from_root` into `to_root`.
    ///
    /// # Errors
    ///
    /// Fails if either root cannot be scanned or a digest cannot be computed.
    pub fn compute_file_delta(
        &self,
        from_root: &Path,
        to_root: &Path,
        direction: Direction,
    ) -> Result<Vec<DeltaRow>> {
        let from = self.scanner.scan(from_root)?;
        let to = self.scanner.scan(to_root)?;
        Ok(self.file_delta(&from, &to, direction)?.0)
    }

    /// Scan both roots once and compute everything a phase needs.
    ///
    /// # Errors
    ///
    /// Fails if either root cannot be scanned or a digest cannot be computed.
    pub fn compute_phase(
        &self,
        from_root: &Path,
        to_root: &Path,
        direction: Direction,
    ) -> Result<PhaseDelta> {
        let from = self.scanner.scan(from_root)?;
        let to = self.scanner.scan(to_root)?;

        let folders = folder_delta(&from, &to);
        let (rows, target_orphans) = self.file_delta(&from, &to, direction)?;

        info!(
            %direction,
            folders = folders.len(),
            rows = rows.len(),
            orphans = target_orphans.len(),
            "delta computed"
        );

        Ok(PhaseDelta {
            direction,
            from_root: from.root,
            to_root: to.root,
            folders,
            rows,
            target_orphans,
        })
    }

    /// Rows for `from` against `to`, plus files found only in `to`.
    fn file_delta(
        &self,
        from: &ScannedTree,
        to: &ScannedTree,
        direction: Direction,
    ) -> Result<(Vec<DeltaRow>, Vec<PathBuf>)> {
        let filter = &self.options.filter;
        let mut rows = Vec::new();

        for entry in from.entries().filter(|e| filter.accepts(e)) {
            let row = match to.file(&entry.relative_path) {
                None => Some(self.missing_row(entry, to, direction)?),
                Some(counterpart) => self.compare(entry, counterpart)?,
            };
            if let Some(row) = row {
                debug!(
                    path = %row.relative_path.display(),
                    class = %row.classification,
                    reason = %row.reason,
                    "delta row"
                );
                rows.push(row);
            }
        }

        let target_orphans = to
            .entries()
            .filter(|e| filter.accepts(e) && from.file(&e.relative_path).is_none())
            .map(|e| e.relative_path.clone())
            .collect();

        Ok((rows, target_orphans))
    }

    /// COPY row for a file with no counterpart. The digest, if computed,
    /// is only for display.
    fn missing_row(
        &self,
        entry: &FileEntry,
        to: &ScannedTree,
        direction: Direction,
    ) -> Result<DeltaRow> {
        let dest_path = to.root.join(&entry.relative_path);
        if self.options.hashable(entry.size) {
            let hashed = entry.clone().with_hash(hash_file(&entry.absolute_path)?);
            Ok(DeltaRow::copy(&hashed, dest_path, direction))
        } else {
            Ok(DeltaRow::copy(entry, dest_path, direction))
        }
    }

    /// Compare a same-path pair. `None` means the files are identical.
    fn compare(&self, from: &FileEntry, to: &FileEntry) -> Result<Option<DeltaRow>> {
        if self.options.hashable(from.size) && self.options.hashable(to.size) {
            let from = from.clone().with_hash(hash_file(&from.absolute_path)?);
            let to = to.clone().with_hash(hash_file(&to.absolute_path)?);
            if from.content_hash == to.content_hash {
                return Ok(None);
            }
            return Ok(Some(DeltaRow::conflict(&from, &to, REASON_HASH)));
        }

        if from.same_size_and_time(to) {
            return Ok(None);
        }

        let reason = if self.options.check_hash {
            format!("{REASON_SIZE_TIME}{LARGE_FILE_NOTE}")
        } else {
            REASON_SIZE_TIME.to_string()
        };
        Ok(Some(DeltaRow::conflict(from, to, reason)))
    }
}

/// Directories in `from` that `to` lacks, parents first.
pub fn folder_delta(from: &ScannedTree, to: &ScannedTree) -> FolderDelta {
    FolderDelta::new(
        from.directories
            .iter()
            .filter(|d| !to.has_directory(d))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;
    use twinsync_core::{Classification, SyncError};

    fn write_at(path: &Path, content: &str, secs: u64) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn roots() -> (TempDir, TempDir) {
        (TempDir::new().unwrap(), TempDir::new().unwrap())
    }

    #[test]
    fn test_folder_delta() {
        let (src, dst) = roots();
        fs::create_dir_all(src.path().join("a/b")).unwrap();
        fs::create_dir_all(src.path().join("shared")).unwrap();
        fs::create_dir_all(dst.path().join("shared")).unwrap();
        fs::create_dir_all(dst.path().join("only-dst")).unwrap();

        let engine = DeltaEngine::default();
        let folders = engine
            .compute_folder_delta(src.path(), dst.path())
            .unwrap();
        let got: Vec<_> = folders.iter().map(Path::to_path_buf).collect();
        assert_eq!(got, vec![PathBuf::from("a"), PathBuf::from("a/b")]);
    }

    #[test]
    fn test_file_vanishing_after_scan_fails_hashing() {
        let (src, dst) = roots();
        write_at(&src.path().join("pair.txt"), "one", 100);
        write_at(&dst.path().join("pair.txt"), "two", 100);
        write_at(&src.path().join("solo.txt"), "three", 100);

        let engine = DeltaEngine::default();
        let from = engine.scanner.scan(src.path()).unwrap();
        let to = engine.scanner.scan(dst.path()).unwrap();
        fs::remove_file(src.path().join("pair.txt")).unwrap();

        let err = engine
            .file_delta(&from, &to, Direction::Forward)
            .unwrap_err();
        assert!(matches!(err, SyncError::HashComputationFailure { ref path, .. }
            if path.ends_with("pair.txt")));

        // A missing-counterpart row is hashed for display and fails the same way.
        fs::remove_file(src.path().join("solo.txt")).unwrap();
        let mut only_solo = from.clone();
        only_solo.files.shift_remove(Path::new("pair.txt"));
        let err = engine
            .file_delta(&only_solo, &to, Direction::Forward)
            .unwrap_err();
        assert!(matches!(err, SyncError::HashComputationFailure { ref path, .. }
            if path.ends_with("solo.txt")));
    }

    #[test]
    fn test_identical_files_emit_no_row() {
        let (src, dst) = roots();
        write_at(&src.path().join("same.txt"), "abc", 100);
        write_at(&dst.path().join("same.txt"), "abc", 999);

        let rows = DeltaEngine::default()
            .compute_file_delta(src.path(), dst.path(), Direction::Forward)
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_file_is_copy_with_display_hash() {
        let (src, dst) = roots();
        write_at(&src.path().join("new.txt"), "A", 100);

        let rows = DeltaEngine::default()
            .compute_file_delta(src.path(), dst.path(), Direction::Forward)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].classification, Classification::Copy);
        assert_eq!(rows[0].reason, "does not exist at destination");
        assert!(rows[0].source.hash_suffix.is_some());
        assert!(rows[0].dest_path.ends_with("new.txt"));
    }

    #[test]
    fn test_missing_file_without_hashing() {
        let (src, dst) = roots();
        write_at(&src.path().join("new.txt"), "A", 100);

        let options = DeltaOptions::builder().check_hash(false).build().unwrap();
        let rows = DeltaEngine::new(options)
            .compute_file_delta(src.path(), dst.path(), Direction::Reverse)
            .unwrap();
        assert_eq!(rows[0].reason, "does not exist at source");
        assert!(rows[0].source.hash_suffix.is_none());
    }

    #[test]
    fn test_size_time_reason_without_hashing() {
        let (src, dst) = roots();
        write_at(&src.path().join("f.txt"), "short", 100);
        write_at(&dst.path().join("f.txt"), "longer text", 100);

        let options = DeltaOptions::builder().check_hash(false).build().unwrap();
        let rows = DeltaEngine::new(options)
            .compute_file_delta(src.path(), dst.path(), Direction::Forward)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reason, "size/timestamp differ");
        assert!(rows[0].destination.is_some());
    }

    #[test]
    fn test_sub_second_mtime_is_equal() {
        let (src, dst) = roots();
        let base = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        for (root, offset) in [(src.path(), 100), (dst.path(), 800)] {
            let path = root.join("f.bin");
            fs::write(&path, "0123").unwrap();
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(base + Duration::from_millis(offset))
                .unwrap();
        }

        let options = DeltaOptions::builder().check_hash(false).build().unwrap();
        let rows = DeltaEngine::new(options)
            .compute_file_delta(src.path(), dst.path(), Direction::Forward)
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_target_orphans_reported() {
        let (src, dst) = roots();
        write_at(&src.path().join("both.txt"), "x", 1);
        write_at(&dst.path().join("both.txt"), "x", 1);
        write_at(&dst.path().join("dst-only.txt"), "y", 1);

        let phase = DeltaEngine::default()
            .compute_phase(src.path(), dst.path(), Direction::Forward)
            .unwrap();
        assert!(phase.rows.is_empty());
        assert_eq!(phase.target_orphans, vec![PathBuf::from("dst-only.txt")]);
    }

    #[test]
    fn test_phase_roots_are_canonical() {
        let (src, dst) = roots();
        let phase = DeltaEngine::default()
            .compute_phase(src.path(), dst.path(), Direction::Forward)
            .unwrap();
        assert_eq!(phase.from_root, src.path().canonicalize().unwrap());
        assert!(phase.is_empty());
    }
}
