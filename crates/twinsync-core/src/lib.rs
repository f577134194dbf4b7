//! Core types and traits for twinsync.
//!
//! This crate provides the fundamental data structures shared by the
//! scanner, the delta engine, the applier and the orchestrator: file
//! entries, delta rows, summaries, configuration, size parsing and
//! extension filtering.

mod config;
mod delta;
mod entry;
mod error;
mod filter;
mod size;
mod summary;

pub use config::{SyncConfig, SyncConfigBuilder, DEFAULT_HASH_THRESHOLD};
pub use delta::{Classification, DeltaRow, Direction, FolderDelta, PhaseDelta, SideInfo};
pub use entry::{ContentHash, FileEntry, HASH_SUFFIX_LEN};
pub use error::{Result, ScanWarning, SyncError, WarningKind};
pub use filter::{ExtensionFilter, normalize_extension};
pub use size::parse_size;
pub use summary::{PhaseResult, SyncAction, SyncSummary};
