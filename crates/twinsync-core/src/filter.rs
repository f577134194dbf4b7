//! Include/exclude filtering by file extension.

use std::collections::HashSet;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::entry::FileEntry;

/// Normalize an extension to lower-case with a single leading dot.
///
/// `"JPG"`, `".jpg"` and `" .Jpg "` all become `".jpg"`. Returns `None` for
/// blank input.
pub fn normalize_extension(raw: &str) -> Option<CompactString> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    let mut ext = CompactString::with_capacity(trimmed.len() + 1);
    ext.push('.');
    ext.push_str(&trimmed.to_lowercase());
    Some(ext)
}

/// Case-insensitive extension filter.
///
/// A non-empty include set keeps only its members; the exclude set is
/// applied afterwards. An empty include set keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionFilter {
    include: HashSet<CompactString>,
    exclude: HashSet<CompactString>,
}

impl ExtensionFilter {
    /// Build a filter from raw extension lists.
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            include: include
                .into_iter()
                .filter_map(|e| normalize_extension(e.as_ref()))
                .collect(),
            exclude: exclude
                .into_iter()
                .filter_map(|e| normalize_extension(e.as_ref()))
                .collect(),
        }
    }

    /// Whether this filter lets every entry through.
    pub fn is_passthrough(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check a single entry.
    pub fn accepts(&self, entry: &FileEntry) -> bool {
        let ext = entry.extension();
        if !self.include.is_empty() && !self.include.contains(ext.as_str()) {
            return false;
        }
        !self.exclude.contains(ext.as_str())
    }

    /// Filter entries, preserving order.
    pub fn apply(&self, entries: Vec<FileEntry>) -> Vec<FileEntry> {
        if self.is_passthrough() {
            return entries;
        }
        entries.into_iter().filter(|e| self.accepts(e)).collect()
    }
}
