//! Orchestrator state machine.

use std::fmt;

use twinsync_core::Direction;

/// Where a run currently is.
///
/// ```text
/// Init -> Scan(F) -> Preview(F) -> Apply(F) | Skip(F)
///      -> Scan(R) -> Preview(R) -> Apply(R) | Skip(R) -> Summary -> Done
/// ```
///
/// `Skip` is taken when the phase has nothing to do; no prompt is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Init,
    Scan(Direction),
    Preview(Direction),
    Apply(Direction),
    Skip(Direction),
    Summary,
    Done,
}

impl SyncState {
    /// The state that follows this one.
    ///
    /// `delta_empty` only matters when leaving a preview.
    pub fn next(self, delta_empty: bool) -> Self {
        match self {
            Self::Init => Self::Scan(Direction::Forward),
            Self::Scan(d) => Self::Preview(d),
            Self::Preview(d) if delta_empty => Self::Skip(d),
            Self::Preview(d) => Self::Apply(d),
            Self::Apply(Direction::Forward) | Self::Skip(Direction::Forward) => {
                Self::Scan(Direction::Reverse)
            }
            Self::Apply(Direction::Reverse) | Self::Skip(Direction::Reverse) => Self::Summary,
            Self::Summary | Self::Done => Self::Done,
        }
    }

    /// Whether moving to `to` follows the protocol.
    pub fn can_advance_to(self, to: SyncState) -> bool {
        to == self.next(false) || to == self.next(true)
    }

    /// Phase this state belongs to, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Scan(d) | Self::Preview(d) | Self::Apply(d) | Self::Skip(d) => Some(d),
            Self::Init | Self::Summary | Self::Done => None,
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Scan(d) => write!(f, "{d} scan"),
            Self::Preview(d) => write!(f, "{d} preview"),
            Self::Apply(d) => write!(f, "{d} apply"),
            Self::Skip(d) => write!(f, "{d} skip"),
            Self::Summary => f.write_str("summary"),
            Self::Done => f.write_str("done"),
        }
    }
}
