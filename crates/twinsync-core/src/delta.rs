//! Delta rows and per-phase difference sets.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::entry::FileEntry;

/// Which way a phase copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Source to destination.
    Forward,
    /// Destination back to source.
    Reverse,
}

impl Direction {
    /// Reason attached to rows whose counterpart does not exist.
    pub fn missing_reason(&self) -> &'static str {
        match self {
            Self::Forward => "does not exist at destination",
            Self::Reverse => "does not exist at source",
        }
    }

    /// Label for the side being copied from.
    pub fn from_label(&self) -> &'static str {
        match self {
            Self::Forward => "Source",
            Self::Reverse => "Destination",
        }
    }

    /// Label for the side being copied to.
    pub fn to_label(&self) -> &'static str {
        match self {
            Self::Forward => "Destination",
            Self::Reverse => "Source",
        }
    }

    /// Arrow used in previews.
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Forward => "-->",
            Self::Reverse => "<--",
        }
    }
}

/// How a row was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// Nothing exists at the mapped path on the other side.
    Copy,
    /// Both sides have an entry and they differ.
    Conflict,
}

/// Size, time and digest suffix for one side of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideInfo {
    pub size: u64,
    pub modified: SystemTime,
    /// Last characters of the digest, when one was computed.
    pub hash_suffix: Option<String>,
}

impl From<&FileEntry> for SideInfo {
    fn from(entry: &FileEntry) -> Self {
        Self {
            size: entry.size,
            modified: entry.modified,
            hash_suffix: entry.content_hash.map(|h| h.suffix()),
        }
    }
}

/// One file-level difference between a "from" and a "to" tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaRow {
    /// Path relative to both roots.
    pub relative_path: PathBuf,
    /// Absolute path on the side being copied from.
    pub source_path: PathBuf,
    /// Absolute path on the side being copied to.
    pub dest_path: PathBuf,
    pub source: SideInfo,
    /// Present only for conflicts.
    pub destination: Option<SideInfo>,
    pub reason: String,
    pub classification: Classification,
}

impl DeltaRow {
    /// A row for a file with no counterpart at `dest_path`.
    pub fn copy(from: &FileEntry, dest_path: PathBuf, direction: Direction) -> Self {
        Self {
            relative_path: from.relative_path.clone(),
            source_path: from.absolute_path.clone(),
            dest_path,
            source: SideInfo::from(from),
            destination: None,
            reason: direction.missing_reason().to_string(),
            classification: Classification::Copy,
        }
    }

    /// A row for two entries at the same relative path that differ.
    pub fn conflict(from: &FileEntry, to: &FileEntry, reason: impl Into<String>) -> Self {
        Self {
            relative_path: from.relative_path.clone(),
            source_path: from.absolute_path.clone(),
            dest_path: to.absolute_path.clone(),
            source: SideInfo::from(from),
            destination: Some(SideInfo::from(to)),
            reason: reason.into(),
            classification: Classification::Conflict,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.classification == Classification::Conflict
    }
}

/// Relative directory paths present under the "from" root only.
///
/// Parents always precede their children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderDelta(Vec<PathBuf>);

impl FolderDelta {
    pub fn new(mut paths: Vec<PathBuf>) -> Self {
        paths.sort();
        Self(paths)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything one phase needs to preview and apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseDelta {
    pub direction: Direction,
    pub from_root: PathBuf,
    pub to_root: PathBuf,
    pub folders: FolderDelta,
    pub rows: Vec<DeltaRow>,
    /// Relative paths of files found only under `to_root`. Shown, never
    /// acted on in this phase.
    pub target_orphans: Vec<PathBuf>,
}

impl PhaseDelta {
    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.folders.is_empty()
    }

    pub fn copy_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_conflict()).count()
    }

    pub fn conflict_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_conflict()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    use crate::entry::ContentHash;

    #[test]
    fn test_copy_row_reason_follows_direction() {
        let from = FileEntry::new("/src/a.txt", "a.txt", 1, UNIX_EPOCH);
        let fwd = DeltaRow::copy(&from, PathBuf::from("/dst/a.txt"), Direction::Forward);
        let rev = DeltaRow::copy(&from, PathBuf::from("/dst/a.txt"), Direction::Reverse);
        assert_eq!(fwd.reason, "does not exist at destination");
        assert_eq!(rev.reason, "does not exist at source");
        assert_eq!(fwd.classification, Classification::Copy);
        assert!(fwd.destination.is_none());
    }

    #[test]
    fn test_conflict_row_carries_both_sides() {
        let from = FileEntry::new("/src/a.txt", "a.txt", 1, UNIX_EPOCH)
            .with_hash(ContentHash::new([0x11; 32]));
        let to = FileEntry::new("/dst/a.txt", "a.txt", 2, UNIX_EPOCH);
        let row = DeltaRow::conflict(&from, &to, "hashes differ");
        assert!(row.is_conflict());
        assert_eq!(row.source.hash_suffix.as_deref(), Some("11111"));
        assert_eq!(row.destination.as_ref().map(|d| d.size), Some(2));
        assert_eq!(row.dest_path, PathBuf::from("/dst/a.txt"));
    }

    #[test]
    fn test_folder_delta_sorted_parents_first() {
        let folders = FolderDelta::new(vec![
            PathBuf::from("a/b"),
            PathBuf::from("a"),
            PathBuf::from("c"),
        ]);
        let order: Vec<_> = folders.iter().collect();
        assert_eq!(order, vec![Path::new("a"), Path::new("a/b"), Path::new("c")]);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Direction::Forward.to_string(), "forward");
        assert_eq!(Classification::Conflict.to_string(), "CONFLICT");
    }
}
