//! Small filesystem helpers used outside the main sync flow.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use twinsync_core::{Result, SyncError};

use crate::copy::{CopyOptions, copy_file};
use crate::naming::{NameScheme, is_free, next_free_path};

/// Regular files directly inside `dir`, sorted by path.
///
/// Subdirectories and symlinks are not listed.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SyncError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| SyncError::io(entry.path(), e))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Move `file` into `dest_dir` without clobbering anything there.
///
/// If the name is taken the file lands as `name (1).ext`, `name (2).ext`
/// and so on. Returns the final path.
pub fn move_unique(file: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let name = file.file_name().ok_or_else(|| SyncError::Io {
        path: file.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;

    fs::create_dir_all(dest_dir).map_err(|e| SyncError::io(dest_dir, e))?;

    let wanted = dest_dir.join(name);
    let target = if is_free(&wanted) {
        wanted
    } else {
        next_free_path(&wanted, NameScheme::Counter)
    };

    // Rename fails across filesystems; fall back to copy and delete.
    if let Err(err) = fs::rename(file, &target) {
        debug!(from = %file.display(), to = %target.display(), %err, "rename failed, copying");
        copy_file(file, &target, CopyOptions::default())?;
        fs::remove_file(file).map_err(|e| SyncError::io(file, e))?;
    }

    Ok(target)
}
