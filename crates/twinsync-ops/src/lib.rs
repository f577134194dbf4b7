//! Filesystem effects for twinsync.
//!
//! This crate turns a computed [`PhaseDelta`](twinsync_core::PhaseDelta) plus
//! an operator's [`SyncAction`](twinsync_core::SyncAction) into copies on
//! disk. Everything here runs synchronously on the calling thread and reports
//! what it did through [`ApplyEvent`] callbacks.

mod apply;
mod copy;
mod naming;
mod primitives;

pub use apply::{ApplyEvent, Applier};
pub use copy::{CopyOptions, copy_file};
pub use naming::{NameScheme, candidate, is_free, next_free_path};
pub use primitives::{list_files, move_unique};
