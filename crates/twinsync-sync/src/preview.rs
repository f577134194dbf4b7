//! Console rendering of phase previews and summaries.

use std::io::{self, Write};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use twinsync_core::{DeltaRow, Direction, PhaseDelta, PhaseResult, SideInfo, SyncSummary};

const RULE_WIDTH: usize = 70;
const PATH_WIDTH: usize = 32;

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

/// Print the preview table for one phase.
pub fn render_phase<W: Write>(out: &mut W, delta: &PhaseDelta) -> io::Result<()> {
    let direction = delta.direction;

    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(
        out,
        " {} phase: {} --> {}",
        title(direction),
        delta.from_root.display(),
        delta.to_root.display()
    )?;
    writeln!(out, "{}", rule())?;

    if delta.is_empty() {
        writeln!(out, " Nothing to sync.")?;
    }

    if !delta.folders.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            " Folders to create under {} ({}):",
            direction.to_label().to_lowercase(),
            delta.folders.len()
        )?;
        for folder in delta.folders.iter() {
            writeln!(out, "   {}", folder.display())?;
        }
    }

    if !delta.rows.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            " Files: {} to copy, {} in conflict",
            delta.copy_count(),
            delta.conflict_count()
        )?;
        writeln!(out)?;
        writeln!(
            out,
            " {:<PATH_WIDTH$} {:>10} {:<19} {:<5}       {:<PATH_WIDTH$} {:>10} {:<19} {:<5}  Reason",
            "Source", "Size", "Modified", "Hash", "Destination", "Size", "Modified", "Hash"
        )?;
        for row in &delta.rows {
            writeln!(out, "{}", format_row(row, direction))?;
        }
    }

    if !delta.target_orphans.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            " Only at {} ({}), not copied in this phase:",
            direction.to_label().to_lowercase(),
            delta.target_orphans.len()
        )?;
        for orphan in &delta.target_orphans {
            writeln!(out, "   {}", orphan.display())?;
        }
    }

    writeln!(out)
}

/// One table line. Source is always on the left; the arrow shows which way
/// the copy would go.
fn format_row(row: &DeltaRow, direction: Direction) -> String {
    let from = Some(&row.source);
    let to = row.destination.as_ref();
    let (left, right) = match direction {
        Direction::Forward => (from, to),
        Direction::Reverse => (to, from),
    };

    let path = truncate(&row.relative_path.display().to_string(), PATH_WIDTH);
    format!(
        " {:<PATH_WIDTH$} {}  {}  {:<PATH_WIDTH$} {}  {}",
        path,
        side_columns(left),
        direction.arrow(),
        path,
        side_columns(right),
        row.reason
    )
}

fn side_columns(side: Option<&SideInfo>) -> String {
    match side {
        Some(info) => format!(
            "{:>10} {:<19} {:<5}",
            format_size(info.size),
            format_time(info.modified),
            info.hash_suffix.as_deref().unwrap_or("-")
        ),
        None => format!("{:>10} {:<19} {:<5}", "-", "-", "-"),
    }
}

/// Print what a phase did.
pub fn render_phase_result<W: Write>(
    out: &mut W,
    direction: Direction,
    result: &PhaseResult,
) -> io::Result<()> {
    writeln!(
        out,
        " {} phase complete: {} folder(s) created, {} file(s) applied",
        title(direction),
        result.folders_created,
        result.files_applied
    )
}

/// Print the final summary block.
pub fn render_summary<W: Write>(out: &mut W, summary: &SyncSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out, " Sync Summary")?;
    writeln!(out, "{}", rule())?;
    writeln!(
        out,
        "   Forward folders created: {:>8}",
        summary.forward_folders_created
    )?;
    writeln!(
        out,
        "   Forward files applied:   {:>8}",
        summary.forward_files_applied
    )?;
    writeln!(
        out,
        "   Reverse folders created: {:>8}",
        summary.reverse_folders_created
    )?;
    writeln!(
        out,
        "   Reverse files applied:   {:>8}",
        summary.reverse_files_applied
    )?;
    writeln!(out, "{}", rule())
}

fn title(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "Forward",
        Direction::Reverse => "Reverse",
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Truncate a string to at most `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};
    use twinsync_core::{FileEntry, FolderDelta};

    fn entry(rel: &str, size: u64) -> FileEntry {
        FileEntry::new(
            PathBuf::from("/root").join(rel),
            rel,
            size,
            UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        )
    }

    fn phase(direction: Direction) -> PhaseDelta {
        let new = entry("X/2.txt", 2048);
        let ours = entry("notes.txt", 10);
        let theirs = entry("notes.txt", 12);
        PhaseDelta {
            direction,
            from_root: PathBuf::from("/from"),
            to_root: PathBuf::from("/to"),
            folders: FolderDelta::new(vec![PathBuf::from("X")]),
            rows: vec![
                DeltaRow::copy(&new, PathBuf::from("/to/X/2.txt"), direction),
                DeltaRow::conflict(&ours, &theirs, "size/timestamp differ"),
            ],
            target_orphans: vec![PathBuf::from("X/1.txt")],
        }
    }

    fn render(delta: &PhaseDelta) -> String {
        let mut out = Vec::new();
        render_phase(&mut out, delta).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_forward_preview() {
        let text = render(&phase(Direction::Forward));
        assert!(text.contains("Forward phase: /from --> /to"));
        assert!(text.contains("Folders to create under destination (1):"));
        assert!(text.contains("Files: 1 to copy, 1 in conflict"));
        assert!(text.contains("2 KiB"));
        assert!(text.contains("does not exist at destination"));
        assert!(text.contains("Only at destination (1)"));
        assert!(text.contains("   X/1.txt"));
        assert!(!text.contains("Nothing to sync."));
    }

    #[test]
    fn test_reverse_rows_point_left() {
        let text = render(&phase(Direction::Reverse));
        let row = text
            .lines()
            .find(|l| l.contains("does not exist at source"))
            .unwrap();
        assert!(row.contains("<--"));
        // The missing side is the source, so the left columns are blank.
        let arrow = row.find("<--").unwrap();
        assert!(!row[..arrow].contains("KiB"));
        assert!(row[arrow..].contains("2 KiB"));
    }

    #[test]
    fn test_empty_phase() {
        let delta = PhaseDelta {
            direction: Direction::Forward,
            from_root: PathBuf::from("/a"),
            to_root: PathBuf::from("/b"),
            folders: FolderDelta::default(),
            rows: Vec::new(),
            target_orphans: Vec::new(),
        };
        assert!(render(&delta).contains("Nothing to sync."));
    }

    #[test]
    fn test_summary_block() {
        let summary = SyncSummary {
            forward_folders_created: 1,
            forward_files_applied: 2,
            reverse_folders_created: 0,
            reverse_files_applied: 3,
        };
        let mut out = Vec::new();
        render_summary(&mut out, &summary).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Sync Summary"));
        assert!(text.contains("Forward files applied:          2"));
        assert!(text.contains("Reverse files applied:          3"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }
}
