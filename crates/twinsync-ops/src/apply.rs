//! Applying a phase delta with the chosen resolution.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use twinsync_core::{
    Classification, DeltaRow, Direction, PhaseDelta, PhaseResult, Result, SyncAction, SyncError,
};

use crate::copy::{CopyOptions, copy_file};
use crate::naming::{NameScheme, is_free, next_free_path};

/// Something the applier did, reported as it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyEvent {
    /// A directory was created.
    FolderCreated(PathBuf),
    /// A file was copied to a previously free path.
    Copied(PathBuf),
    /// An existing file was replaced.
    Overwrote(PathBuf),
    /// A file was copied under a generated name.
    Duplicated(PathBuf),
    /// A row was left alone.
    Skipped { path: PathBuf, reason: &'static str },
}

impl fmt::Display for ApplyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FolderCreated(p) => write!(f, "Created folder: {}", p.display()),
            Self::Copied(p) => write!(f, "Copied: {}", p.display()),
            Self::Overwrote(p) => write!(f, "Overwrote: {}", p.display()),
            Self::Duplicated(p) => write!(f, "Duplicated as: {}", p.display()),
            Self::Skipped { path, reason } => {
                write!(f, "Skipped: {} ({reason})", path.display())
            }
        }
    }
}

/// Executes one phase's resolution.
///
/// | Row      | Copy           | Overwrite        | Duplicate              | Skip  |
/// |----------|----------------|------------------|------------------------|-------|
/// | COPY     | copy if absent | copy, replacing  | copy under new name    | no-op |
/// | CONFLICT | no-op          | replace target   | copy alongside         | no-op |
///
/// Overwrite is refused in the reverse direction. There is no rollback: an
/// error stops the pass and earlier copies stay in place.
#[derive(Debug, Clone, Default)]
pub struct Applier {
    copy_options: CopyOptions,
}

impl Applier {
    /// Create an applier with default copy options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an applier with custom copy options.
    pub fn with_options(copy_options: CopyOptions) -> Self {
        Self { copy_options }
    }

    /// Apply `action` to every folder and row in `delta`.
    ///
    /// # Errors
    ///
    /// [`SyncError::ActionNotPermitted`] for Overwrite in the reverse phase,
    /// [`SyncError::Io`] when a folder cannot be created, and
    /// [`SyncError::CopyFailure`] when a file copy fails.
    pub fn apply<F>(&self, delta: &PhaseDelta, action: SyncAction, mut on_event: F) -> Result<PhaseResult>
    where
        F: FnMut(&ApplyEvent),
    {
        let direction = delta.direction;
        if !action.permitted_in(direction) {
            return Err(SyncError::ActionNotPermitted {
                action: action.to_string(),
                direction: direction.to_string(),
            });
        }
        if action == SyncAction::Skip {
            info!(%direction, "phase skipped by operator");
            return Ok(PhaseResult::default());
        }

        let mut result = PhaseResult::default();

        for relative in delta.folders.iter() {
            let path = delta.to_root.join(relative);
            if path.is_dir() {
                continue;
            }
            fs::create_dir_all(&path).map_err(|e| SyncError::io(&path, e))?;
            result.folders_created += 1;
            emit(&mut on_event, ApplyEvent::FolderCreated(path));
        }

        for row in &delta.rows {
            if let Some(event) = self.apply_row(row, action, direction)? {
                if !matches!(event, ApplyEvent::Skipped { .. }) {
                    result.files_applied += 1;
                }
                emit(&mut on_event, event);
            }
        }

        info!(
            %direction,
            %action,
            folders = result.folders_created,
            files = result.files_applied,
            "phase applied"
        );
        Ok(result)
    }

    fn apply_row(
        &self,
        row: &DeltaRow,
        action: SyncAction,
        direction: Direction,
    ) -> Result<Option<ApplyEvent>> {
        let target = row.dest_path.as_path();

        let event = match (row.classification, action) {
            (_, SyncAction::Skip) => None,
            (Classification::Conflict, SyncAction::Copy) => {
                debug!(path = %row.relative_path.display(), "conflict left as is");
                None
            }
            (Classification::Copy, SyncAction::Copy) => {
                if is_free(target) {
                    self.copy(&row.source_path, target)?;
                    Some(ApplyEvent::Copied(target.to_path_buf()))
                } else {
                    Some(ApplyEvent::Skipped {
                        path: target.to_path_buf(),
                        reason: "appeared at target since scan",
                    })
                }
            }
            (_, SyncAction::Overwrite) => {
                debug_assert_eq!(direction, Direction::Forward);
                let existed = !is_free(target);
                self.copy(&row.source_path, target)?;
                Some(if existed {
                    ApplyEvent::Overwrote(target.to_path_buf())
                } else {
                    ApplyEvent::Copied(target.to_path_buf())
                })
            }
            (_, SyncAction::Duplicate) => {
                let renamed = next_free_path(target, NameScheme::Duplicate);
                self.copy(&row.source_path, &renamed)?;
                Some(ApplyEvent::Duplicated(renamed))
            }
        };
        Ok(event)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        copy_file(from, to, self.copy_options)
    }
}

fn emit<F: FnMut(&ApplyEvent)>(on_event: &mut F, event: ApplyEvent) {
    debug!("{event}");
    on_event(&event);
}
