//! Two-phase folder reconciliation for twinsync.
//!
//! A sync runs a forward phase (source to destination) and then a reverse
//! phase (destination back to source). Each phase is previewed, an action is
//! chosen through an [`ActionPrompt`], and the action is applied. The reverse
//! phase never overwrites.
//!
//! # Example
//!
//! ```rust,no_run
//! use twinsync_core::{SyncAction, SyncConfig};
//! use twinsync_sync::{FixedActions, SyncOrchestrator};
//!
//! let config = SyncConfig::builder()
//!     .source("/data/photos")
//!     .destination("/mnt/backup/photos")
//!     .build()
//!     .unwrap();
//! let prompt = FixedActions::both(SyncAction::Copy).unwrap();
//!
//! let summary = SyncOrchestrator::new(config, prompt, std::io::stdout())
//!     .run()
//!     .unwrap();
//! println!("{} files copied forward", summary.forward_files_applied);
//! ```

mod orchestrator;
mod preview;
mod prompt;
mod state;

use std::path::PathBuf;

pub use orchestrator::{DiffReport, SyncOrchestrator, diff_folders};
pub use prompt::{ActionPrompt, FixedActions, LinePrompt, TerminalPrompt, menu, stdio_prompt};
pub use state::SyncState;

use twinsync_core::{Result, SyncConfig, SyncError, SyncSummary, parse_size};

/// Interactive sync on the process's standard streams.
///
/// `hash_threshold` is a size expression such as `"2GB"`; it is parsed
/// before anything is scanned.
///
/// # Errors
///
/// [`SyncError::InvalidSizeExpression`] for a bad threshold,
/// [`SyncError::InvalidConfig`] for unusable roots, and anything
/// [`SyncOrchestrator::run`] reports.
pub fn sync_folders(
    source: impl Into<PathBuf>,
    destination: impl Into<PathBuf>,
    check_hash: bool,
    hash_threshold: &str,
    include_extensions: &[&str],
    exclude_extensions: &[&str],
) -> Result<SyncSummary> {
    let hash_threshold = parse_size(hash_threshold)?;
    let config = SyncConfig::builder()
        .source(source)
        .destination(destination)
        .check_hash(check_hash)
        .hash_threshold(hash_threshold)
        .include_extensions(to_strings(include_extensions))
        .exclude_extensions(to_strings(exclude_extensions))
        .build()
        .map_err(|e| SyncError::invalid_config(e.to_string()))?;

    SyncOrchestrator::new(config, stdio_prompt(), std::io::stdout()).run()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
