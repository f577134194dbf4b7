//! Whole-file copy.

use std::fs;
use std::path::Path;

use twinsync_core::{Result, SyncError};

/// Options for copy operations.
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions {
    /// Carry the source modification time over to the copy.
    pub preserve_timestamps: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            preserve_timestamps: true,
        }
    }
}

/// Copy a single file, creating the target's parent directories first.
///
/// An existing file at `to` is replaced. Returns the number of bytes copied.
///
/// # Errors
///
/// Any failure is reported as [`SyncError::CopyFailure`].
pub fn copy_file(from: &Path, to: &Path, options: CopyOptions) -> Result<u64> {
    let failure = |source: std::io::Error| SyncError::CopyFailure {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(failure)?;
    }

    let bytes = fs::copy(from, to).map_err(failure)?;

    if options.preserve_timestamps {
        let modified = fs::metadata(from).and_then(|m| m.modified()).map_err(failure)?;
        fs::File::options()
            .write(true)
            .open(to)
            .and_then(|f| f.set_modified(modified))
            .map_err(failure)?;
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn test_copy_creates_parents_and_keeps_mtime() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.txt");
        fs::write(&from, "hello").unwrap();
        let mtime = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        fs::File::options()
            .write(true)
            .open(&from)
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        let to = temp.path().join("deep/nested/a.txt");
        let bytes = copy_file(&from, &to, CopyOptions::default()).unwrap();

        assert_eq!(bytes, 5);
        assert_eq!(fs::read_to_string(&to).unwrap(), "hello");
        assert_eq!(fs::metadata(&to).unwrap().modified().unwrap(), mtime);
    }

    #[test]
    fn test_copy_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("new.txt");
        let to = temp.path().join("old.txt");
        fs::write(&from, "new").unwrap();
        fs::write(&to, "old content").unwrap();

        copy_file(&from, &to, CopyOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(&to).unwrap(), "new");
    }

    #[test]
    fn test_copy_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = copy_file(
            &temp.path().join("missing"),
            &temp.path().join("out"),
            CopyOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::CopyFailure { .. }));
    }
}
