//! Scanned file entries and content digests.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of trailing hex characters shown for a digest in previews.
pub const HASH_SUFFIX_LEN: usize = 5;

/// BLAKE3 content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Last [`HASH_SUFFIX_LEN`] hex characters, for display.
    pub fn suffix(&self) -> String {
        let hex = self.to_hex();
        hex[hex.len() - HASH_SUFFIX_LEN..].to_string()
    }
}

/// A file found under a scan root.
///
/// Entries are snapshots taken at scan time. Attaching a digest produces a
/// new value; a re-scan produces fresh entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path on disk.
    pub absolute_path: PathBuf,
    /// Path relative to the scan root.
    pub relative_path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// Content digest, when one has been computed.
    pub content_hash: Option<ContentHash>,
}

impl FileEntry {
    /// Create an entry without a digest.
    pub fn new(
        absolute_path: impl Into<PathBuf>,
        relative_path: impl Into<PathBuf>,
        size: u64,
        modified: SystemTime,
    ) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            relative_path: relative_path.into(),
            size,
            modified,
            content_hash: None,
        }
    }

    /// Return a copy of this entry carrying `hash`.
    #[must_use]
    pub fn with_hash(self, hash: ContentHash) -> Self {
        Self {
            content_hash: Some(hash),
            ..self
        }
    }

    /// Lower-cased extension including the leading dot, or `""`.
    pub fn extension(&self) -> String {
        extension_of(&self.relative_path)
    }

    /// Modification time truncated to whole seconds since the Unix epoch.
    ///
    /// Sub-second differences are ignored when comparing.
    pub fn modified_secs(&self) -> i64 {
        DateTime::<Utc>::from(self.modified).timestamp()
    }

    /// Whether size and second-resolution mtime both match `other`.
    pub fn same_size_and_time(&self, other: &FileEntry) -> bool {
        self.size == other.size && self.modified_secs() == other.modified_secs()
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
