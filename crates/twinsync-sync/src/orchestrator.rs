//! The two-phase reconciliation driver.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use twinsync_core::{
    Direction, PhaseDelta, PhaseResult, Result, SyncAction, SyncConfig, SyncError, SyncSummary,
};
use twinsync_delta::{DeltaEngine, DeltaOptions};
use twinsync_ops::Applier;

use crate::preview;
use crate::prompt::ActionPrompt;
use crate::state::SyncState;

/// Runs one sync invocation: forward phase, reverse phase, summary.
///
/// Each phase scans both trees, prints a preview, asks `prompt` for an
/// action when there is anything to do, applies it and prints the phase
/// result. Console output goes to `out`; diagnostics go through `tracing`.
pub struct SyncOrchestrator<P, W> {
    config: SyncConfig,
    engine: DeltaEngine,
    applier: Applier,
    prompt: P,
    out: W,
    state: SyncState,
}

impl<P: ActionPrompt, W: Write> SyncOrchestrator<P, W> {
    /// Create an orchestrator for `config`.
    pub fn new(config: SyncConfig, prompt: P, out: W) -> Self {
        let engine = DeltaEngine::new(DeltaOptions::from(&config));
        Self {
            config,
            engine,
            applier: Applier::new(),
            prompt,
            out,
            state: SyncState::Init,
        }
    }

    /// Use a custom applier.
    #[must_use]
    pub fn with_applier(mut self, applier: Applier) -> Self {
        self.applier = applier;
        self
    }

    /// Run both phases and return the combined summary.
    ///
    /// # Errors
    ///
    /// [`SyncError::RootNotFound`] if the source is missing, before anything
    /// is touched. Scan, hash, copy and prompt failures abort the run; files
    /// already copied stay in place.
    pub fn run(mut self) -> Result<SyncSummary> {
        self.prepare_roots()?;

        let mut summary = SyncSummary::default();
        for direction in [Direction::Forward, Direction::Reverse] {
            let result = self.run_phase(direction)?;
            summary = summary.merged_with(direction, result);
        }

        self.enter(SyncState::Summary);
        preview::render_summary(&mut self.out, &summary).map_err(SyncError::Output)?;
        self.out.flush().map_err(SyncError::Output)?;
        self.enter(SyncState::Done);

        info!(
            forward_folders = summary.forward_folders_created,
            forward_files = summary.forward_files_applied,
            reverse_folders = summary.reverse_folders_created,
            reverse_files = summary.reverse_files_applied,
            "sync complete"
        );
        Ok(summary)
    }

    fn prepare_roots(&self) -> Result<()> {
        let source = &self.config.source;
        if !source.is_dir() {
            return Err(SyncError::RootNotFound {
                path: source.clone(),
            });
        }

        let destination = &self.config.destination;
        if !destination.is_dir() {
            fs::create_dir_all(destination).map_err(|e| SyncError::io(destination, e))?;
            info!(path = %destination.display(), "created destination root");
        }
        Ok(())
    }

    fn roots(&self, direction: Direction) -> (&Path, &Path) {
        let source = self.config.source.as_path();
        let destination = self.config.destination.as_path();
        match direction {
            Direction::Forward => (source, destination),
            Direction::Reverse => (destination, source),
        }
    }

    fn run_phase(&mut self, direction: Direction) -> Result<PhaseResult> {
        self.enter(SyncState::Scan(direction));
        let (from, to) = self.roots(direction);
        let delta = self.engine.compute_phase(from, to, direction)?;

        self.enter(SyncState::Preview(direction));
        preview::render_phase(&mut self.out, &delta).map_err(SyncError::Output)?;

        let result = if delta.is_empty() {
            self.enter(SyncState::Skip(direction));
            PhaseResult::default()
        } else {
            self.enter(SyncState::Apply(direction));
            self.out.flush().map_err(SyncError::Output)?;
            let action = self.prompt.choose(&delta)?;
            info!(%direction, %action, "action chosen");
            self.apply(&delta, action)?
        };

        preview::render_phase_result(&mut self.out, direction, &result)
            .map_err(SyncError::Output)?;
        Ok(result)
    }

    fn apply(&mut self, delta: &PhaseDelta, action: SyncAction) -> Result<PhaseResult> {
        let out = &mut self.out;
        let mut write_error = None;

        let result = self.applier.apply(delta, action, |event| {
            if write_error.is_none() {
                write_error = writeln!(out, " {event}").err();
            }
        })?;

        match write_error {
            Some(e) => Err(SyncError::Output(e)),
            None => Ok(result),
        }
    }

    fn enter(&mut self, next: SyncState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }
}

/// Both phase deltas for a pair of roots, computed without touching either.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub forward: PhaseDelta,
    pub reverse: PhaseDelta,
}

impl DiffReport {
    /// Whether neither phase has anything to do.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }

    /// Print both previews.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        preview::render_phase(out, &self.forward).map_err(SyncError::Output)?;
        preview::render_phase(out, &self.reverse).map_err(SyncError::Output)
    }
}

/// Compute what a sync would see, without creating or copying anything.
///
/// The reverse delta assumes the forward phase is skipped. Both roots must
/// exist.
pub fn diff_folders(config: &SyncConfig) -> Result<DiffReport> {
    let engine = DeltaEngine::new(DeltaOptions::from(config));
    let forward = engine.compute_phase(&config.source, &config.destination, Direction::Forward)?;
    let reverse = engine.compute_phase(&config.destination, &config.source, Direction::Reverse)?;
    Ok(DiffReport { forward, reverse })
}
