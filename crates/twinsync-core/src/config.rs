//! Sync configuration types.

use std::path::PathBuf;

use derive_builder::Builder;

use crate::filter::ExtensionFilter;

/// Default hash threshold: 2 GiB.
pub const DEFAULT_HASH_THRESHOLD: u64 = 2 * 1024 * 1024 * 1024;

/// Configuration for one sync invocation.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct SyncConfig {
    /// Source root. Must exist.
    pub source: PathBuf,

    /// Destination root. Created when missing.
    pub destination: PathBuf,

    /// Compare contents by digest (files at or under the threshold).
    #[builder(default = "true")]
    pub check_hash: bool,

    /// Files larger than this are compared by size and time only.
    #[builder(default = "DEFAULT_HASH_THRESHOLD")]
    pub hash_threshold: u64,

    /// Extensions to include (empty = all).
    #[builder(default)]
    pub include_extensions: Vec<String>,

    /// Extensions to exclude.
    #[builder(default)]
    pub exclude_extensions: Vec<String>,
}

impl SyncConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let source = match self.source {
            Some(ref p) if !p.as_os_str().is_empty() => p,
            Some(_) => return Err("Source path cannot be empty".to_string()),
            None => return Err("Source path is required".to_string()),
        };
        let destination = match self.destination {
            Some(ref p) if !p.as_os_str().is_empty() => p,
            Some(_) => return Err("Destination path cannot be empty".to_string()),
            None => return Err("Destination path is required".to_string()),
        };
        if source == destination {
            return Err("Source and destination must differ".to_string());
        }
        Ok(())
    }
}

impl SyncConfig {
    /// Create a new config builder.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Create a config with defaults for everything but the roots.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            check_hash: true,
            hash_threshold: DEFAULT_HASH_THRESHOLD,
            include_extensions: Vec::new(),
            exclude_extensions: Vec::new(),
        }
    }

    /// The extension filter these settings describe.
    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::new(&self.include_extensions, &self.exclude_extensions)
    }
}
