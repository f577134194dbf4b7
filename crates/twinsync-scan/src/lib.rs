//! File system scanning engine for twinsync.
//!
//! Walks a root directory with jwalk and returns every regular file and
//! directory beneath it, keyed by path relative to the root.
//!
//! # Example
//!
//! ```rust,no_run
//! use twinsync_scan::TreeScanner;
//!
//! let tree = TreeScanner::new().scan("/path/to/scan".as_ref()).unwrap();
//!
//! println!("Total size: {} bytes", tree.stats.total_size);
//! println!("Total files: {}", tree.stats.total_files);
//! ```

mod scanner;

pub use scanner::{ScanStats, ScannedTree, TreeScanner};

// Re-export core types for convenience
pub use twinsync_core::{FileEntry, ScanWarning, SyncError, WarningKind};
