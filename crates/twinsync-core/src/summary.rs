//! Resolution actions and per-phase / per-run tallies.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::delta::Direction;

/// Operator-chosen resolution for one phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    /// Copy files missing on the other side; leave conflicts alone.
    Copy,
    /// Copy and replace conflicting files. Forward phase only.
    Overwrite,
    /// Copy conflicting files under a non-colliding name.
    Duplicate,
    /// Do nothing.
    Skip,
}

impl SyncAction {
    /// Single-letter menu code.
    pub fn code(&self) -> char {
        match self {
            Self::Copy => 'C',
            Self::Overwrite => 'O',
            Self::Duplicate => 'D',
            Self::Skip => 'S',
        }
    }

    /// Whether this action may be used in `direction`.
    pub fn permitted_in(&self, direction: Direction) -> bool {
        !(direction == Direction::Reverse && *self == Self::Overwrite)
    }

    /// Actions offered in `direction`, in menu order.
    pub fn choices(direction: Direction) -> Vec<SyncAction> {
        Self::iter().filter(|a| a.permitted_in(direction)).collect()
    }

    /// Decode operator input for `direction`.
    ///
    /// Accepts the single-letter code in either case, surrounded by optional
    /// whitespace. Returns `None` for anything else, including codes not
    /// offered in that direction.
    pub fn from_code(input: &str, direction: Direction) -> Option<SyncAction> {
        let mut chars = input.trim().chars();
        let code = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() {
            return None;
        }
        Self::choices(direction).into_iter().find(|a| a.code() == code)
    }
}

/// What one apply pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub folders_created: u64,
    pub files_applied: u64,
}

/// Counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub forward_folders_created: u64,
    pub forward_files_applied: u64,
    pub reverse_folders_created: u64,
    pub reverse_files_applied: u64,
}

impl SyncSummary {
    /// Return a new summary with `result` added to the `direction` counters.
    #[must_use]
    pub fn merged_with(self, direction: Direction, result: PhaseResult) -> Self {
        match direction {
            Direction::Forward => Self {
                forward_folders_created: self.forward_folders_created + result.folders_created,
                forward_files_applied: self.forward_files_applied + result.files_applied,
                ..self
            },
            Direction::Reverse => Self {
                reverse_folders_created: self.reverse_folders_created + result.folders_created,
                reverse_files_applied: self.reverse_files_applied + result.files_applied,
                ..self
            },
        }
    }

    /// Whether nothing was changed.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
