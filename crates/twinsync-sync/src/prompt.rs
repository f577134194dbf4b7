//! Choosing a resolution action for a phase.
//!
//! The orchestrator asks an [`ActionPrompt`] once per non-empty phase. Three
//! strategies are provided:
//!
//! - [`TerminalPrompt`] - interactive input on a terminal via dialoguer
//! - [`LinePrompt`] - plain line input from any reader, for pipes and tests
//! - [`FixedActions`] - pre-supplied actions, for headless runs

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::Input;
use itertools::Itertools;
use tracing::debug;

use twinsync_core::{Direction, PhaseDelta, Result, SyncAction, SyncError};

/// Decides which action to take for a phase.
pub trait ActionPrompt {
    /// Return the action for `delta`.
    ///
    /// Implementations must only return actions permitted in
    /// `delta.direction`.
    fn choose(&mut self, delta: &PhaseDelta) -> Result<SyncAction>;
}

impl<P: ActionPrompt + ?Sized> ActionPrompt for Box<P> {
    fn choose(&mut self, delta: &PhaseDelta) -> Result<SyncAction> {
        (**self).choose(delta)
    }
}

/// Menu text for `direction`, e.g. `[C]opy, [D]uplicate, [S]kip`.
pub fn menu(direction: Direction) -> String {
    SyncAction::choices(direction)
        .into_iter()
        .map(|action| {
            let rest: String = action.to_string().chars().skip(1).collect();
            format!("[{}]{}", action.code(), rest)
        })
        .join(", ")
}

fn question(direction: Direction) -> String {
    format!("{} phase action? {}", capitalize(direction), menu(direction))
}

fn capitalize(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "Forward",
        Direction::Reverse => "Reverse",
    }
}

/// Reads one code per line, re-asking until a valid one arrives.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    /// Create a prompt reading from `input` and asking on `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> ActionPrompt for LinePrompt<R, W> {
    fn choose(&mut self, delta: &PhaseDelta) -> Result<SyncAction> {
        let direction = delta.direction;
        let write_failed = |e: io::Error| SyncError::prompt(format!("cannot write prompt: {e}"));

        loop {
            write!(self.output, "{}: ", question(direction)).map_err(write_failed)?;
            self.output.flush().map_err(write_failed)?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| SyncError::prompt(format!("cannot read input: {e}")))?;
            if read == 0 {
                return Err(SyncError::prompt("input closed before an action was chosen"));
            }

            match SyncAction::from_code(&line, direction) {
                Some(action) => return Ok(action),
                None => {
                    debug!(input = line.trim(), %direction, "rejected action code");
                    writeln!(
                        self.output,
                        "Invalid choice '{}'. Enter one of: {}",
                        line.trim(),
                        SyncAction::choices(direction).iter().map(|a| a.code()).join(", ")
                    )
                    .map_err(write_failed)?;
                }
            }
        }
    }
}

/// Interactive prompt on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl ActionPrompt for TerminalPrompt {
    fn choose(&mut self, delta: &PhaseDelta) -> Result<SyncAction> {
        let direction = delta.direction;
        let answer: String = Input::new()
            .with_prompt(question(direction))
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                SyncAction::from_code(input, direction)
                    .map(|_| ())
                    .ok_or_else(|| format!("enter one of: {}", menu(direction)))
            })
            .interact_text()
            .map_err(|e| SyncError::prompt(e.to_string()))?;

        SyncAction::from_code(&answer, direction)
            .ok_or_else(|| SyncError::prompt(format!("unexpected answer '{answer}'")))
    }
}

/// Answers every prompt with a pre-chosen action per direction.
#[derive(Debug, Clone, Copy)]
pub struct FixedActions {
    forward: SyncAction,
    reverse: SyncAction,
}

impl FixedActions {
    /// Create a fixed policy.
    ///
    /// # Errors
    ///
    /// [`SyncError::ActionNotPermitted`] if `reverse` is Overwrite.
    pub fn new(forward: SyncAction, reverse: SyncAction) -> Result<Self> {
        if !reverse.permitted_in(Direction::Reverse) {
            return Err(SyncError::ActionNotPermitted {
                action: reverse.to_string(),
                direction: Direction::Reverse.to_string(),
            });
        }
        Ok(Self { forward, reverse })
    }

    /// The same action in both phases.
    pub fn both(action: SyncAction) -> Result<Self> {
        Self::new(action, action)
    }
}

impl ActionPrompt for FixedActions {
    fn choose(&mut self, delta: &PhaseDelta) -> Result<SyncAction> {
        Ok(match delta.direction {
            Direction::Forward => self.forward,
            Direction::Reverse => self.reverse,
        })
    }
}

/// Prompt on the process's standard streams.
///
/// Uses [`TerminalPrompt`] when stdin is a terminal and [`LinePrompt`]
/// otherwise.
pub fn stdio_prompt() -> Box<dyn ActionPrompt> {
    if io::stdin().is_terminal() {
        Box::new(TerminalPrompt::new())
    } else {
        Box::new(LinePrompt::new(io::stdin().lock(), io::stdout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use twinsync_core::FolderDelta;

    fn delta(direction: Direction) -> PhaseDelta {
        PhaseDelta {
            direction,
            from_root: PathBuf::from("/from"),
            to_root: PathBuf::from("/to"),
            folders: FolderDelta::default(),
            rows: Vec::new(),
            target_orphans: Vec::new(),
        }
    }

    #[test]
    fn test_menu_per_direction() {
        assert_eq!(
            menu(Direction::Forward),
            "[C]opy, [O]verwrite, [D]uplicate, [S]kip"
        );
        assert_eq!(menu(Direction::Reverse), "[C]opy, [D]uplicate, [S]kip");
    }

    #[test]
    fn test_line_prompt_reprompts_until_valid() {
        let input = b"x\nO\n  d \n".as_slice();
        let mut output = Vec::new();
        let mut prompt = LinePrompt::new(input, &mut output);

        let action = prompt.choose(&delta(Direction::Reverse)).unwrap();
        assert_eq!(action, SyncAction::Duplicate);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Reverse phase action?").count(), 3);
        assert!(text.contains("Invalid choice 'x'"));
        assert!(text.contains("Invalid choice 'O'"));
    }

    #[test]
    fn test_line_prompt_closed_input() {
        let mut prompt = LinePrompt::new(b"".as_slice(), Vec::new());
        let err = prompt.choose(&delta(Direction::Forward)).unwrap_err();
        assert!(matches!(err, SyncError::Prompt { .. }));
    }

    #[test]
    fn test_fixed_actions() {
        let mut fixed = FixedActions::new(SyncAction::Overwrite, SyncAction::Copy).unwrap();
        assert_eq!(
            fixed.choose(&delta(Direction::Forward)).unwrap(),
            SyncAction::Overwrite
        );
        assert_eq!(
            fixed.choose(&delta(Direction::Reverse)).unwrap(),
            SyncAction::Copy
        );
        assert!(FixedActions::both(SyncAction::Overwrite).is_err());
    }

    #[test]
    fn test_boxed_prompt() {
        let mut boxed: Box<dyn ActionPrompt> =
            Box::new(FixedActions::both(SyncAction::Skip).unwrap());
        assert_eq!(
            boxed.choose(&delta(Direction::Forward)).unwrap(),
            SyncAction::Skip
        );
    }
}
