//! Difference computation for twinsync.
//!
//! Given a "from" root and a "to" root, the [`DeltaEngine`] produces:
//!
//! - **Folder delta** - directories to create under the "to" root
//! - **File delta** - rows for files that are missing (COPY) or differ
//!   (CONFLICT) on the "to" side
//! - **Target orphans** - files that exist only under the "to" root
//!
//! Equality is decided by BLAKE3 digest for files at or under the hash
//! threshold, and by size plus whole-second modification time otherwise.
//!
//! ```rust,no_run
//! use twinsync_core::Direction;
//! use twinsync_delta::{DeltaEngine, DeltaOptions};
//!
//! let options = DeltaOptions::builder()
//!     .hash_threshold(512 * 1024 * 1024u64)
//!     .build()
//!     .unwrap();
//! let engine = DeltaEngine::new(options);
//! let phase = engine
//!     .compute_phase("/data/photos".as_ref(), "/mnt/backup/photos".as_ref(), Direction::Forward)
//!     .unwrap();
//!
//! println!("{} rows, {} new folders", phase.rows.len(), phase.folders.len());
//! ```

mod engine;
mod hash;

pub use engine::{DeltaEngine, DeltaOptions, DeltaOptionsBuilder, folder_delta};
pub use hash::hash_file;

// Re-export core types
pub use twinsync_core::{Classification, DeltaRow, Direction, FolderDelta, PhaseDelta};
