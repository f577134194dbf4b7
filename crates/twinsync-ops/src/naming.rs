//! Collision-safe target naming.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// How to derive alternative names for an occupied path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameScheme {
    /// `name-duplicate.ext`, `name-duplicate1.ext`, `name-duplicate2.ext`, ...
    Duplicate,
    /// `name (1).ext`, `name (2).ext`, ...
    Counter,
}

impl NameScheme {
    /// Suffix appended to the stem for the `attempt`-th candidate.
    fn suffix(&self, attempt: u64) -> String {
        match self {
            Self::Duplicate if attempt == 0 => "-duplicate".to_string(),
            Self::Duplicate => format!("-duplicate{attempt}"),
            Self::Counter => format!(" ({})", attempt + 1),
        }
    }
}

/// Whether nothing (not even a dangling link) occupies `path`.
pub fn is_free(path: &Path) -> bool {
    fs::symlink_metadata(path).is_err()
}

/// Candidate name for `path` under `scheme`, without checking the disk.
pub fn candidate(path: &Path, scheme: NameScheme, attempt: u64) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    let mut name = OsString::from(stem);
    name.push(scheme.suffix(attempt));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// First unused alternative to `path` under `scheme`.
///
/// The original path itself is never returned; candidates are tried in
/// order until one is free.
pub fn next_free_path(path: &Path, scheme: NameScheme) -> PathBuf {
    let mut attempt = 0;
    loop {
        let next = candidate(path, scheme, attempt);
        if is_free(&next) {
            return next;
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_duplicate_candidates() {
        let path = Path::new("/tmp/photo.jpg");
        assert_eq!(
            candidate(path, NameScheme::Duplicate, 0),
            PathBuf::from("/tmp/photo-duplicate.jpg")
        );
        assert_eq!(
            candidate(path, NameScheme::Duplicate, 1),
            PathBuf::from("/tmp/photo-duplicate1.jpg")
        );
        assert_eq!(
            candidate(path, NameScheme::Duplicate, 2),
            PathBuf::from("/tmp/photo-duplicate2.jpg")
        );
    }

    #[test]
    fn test_counter_candidates() {
        let path = Path::new("/tmp/test.txt");
        assert_eq!(
            candidate(path, NameScheme::Counter, 0),
            PathBuf::from("/tmp/test (1).txt")
        );
        assert_eq!(
            candidate(path, NameScheme::Counter, 4),
            PathBuf::from("/tmp/test (5).txt")
        );
    }

    #[test]
    fn test_no_extension() {
        assert_eq!(
            candidate(Path::new("/tmp/testfile"), NameScheme::Duplicate, 0),
            PathBuf::from("/tmp/testfile-duplicate")
        );
        assert_eq!(
            candidate(Path::new("/tmp/.bashrc"), NameScheme::Counter, 0),
            PathBuf::from("/tmp/.bashrc (1)")
        );
    }

    #[test]
    fn test_next_free_skips_occupied() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("photo.jpg");
        std::fs::write(&target, "a").unwrap();
        std::fs::write(temp.path().join("photo-duplicate.jpg"), "b").unwrap();

        assert_eq!(
            next_free_path(&target, NameScheme::Duplicate),
            temp.path().join("photo-duplicate1.jpg")
        );
    }

    #[test]
    fn test_next_free_first_candidate() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a.txt");
        assert_eq!(
            next_free_path(&target, NameScheme::Duplicate),
            temp.path().join("a-duplicate.txt")
        );
        assert_eq!(
            next_free_path(&target, NameScheme::Counter),
            temp.path().join("a (1).txt")
        );
    }
}
