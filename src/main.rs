//! twinsync - A two-phase, reconciling folder synchronizer.
//!
//! Usage:
//!   twinsync sync SOURCE DEST    Preview, choose and apply in both directions
//!   twinsync diff SOURCE DEST    Show what a sync would do (dry run)
//!   twinsync --help              Show help

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use twinsync_core::{DEFAULT_HASH_THRESHOLD, SyncAction, SyncConfig, parse_size};
use twinsync_sync::{FixedActions, SyncOrchestrator, diff_folders, stdio_prompt};

#[derive(Parser)]
#[command(
    name = "twinsync",
    version,
    about = "A two-phase, reconciling folder synchronizer",
    long_about = "twinsync compares two folders, shows what differs and lets you \
                  copy, overwrite, duplicate or skip - first from source to \
                  destination, then back again.\n\n\
                  The reverse phase never overwrites."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to <config dir>/twinsync/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync two folders in both directions
    Sync {
        #[command(flatten)]
        compare: CompareArgs,

        /// Action for the forward phase (skips the prompt)
        #[arg(long)]
        forward: Option<ActionArg>,

        /// Action for the reverse phase (skips the prompt)
        #[arg(long)]
        reverse: Option<ActionArg>,
    },

    /// Show both phase deltas without changing anything
    Diff {
        #[command(flatten)]
        compare: CompareArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct CompareArgs {
    /// Source folder
    source: PathBuf,

    /// Destination folder (created if missing)
    destination: PathBuf,

    /// Compare by size and modification time only
    #[arg(long)]
    no_check_hash: bool,

    /// Largest file that is still hashed (e.g., "500MB", "2GB")
    #[arg(long)]
    hash_threshold: Option<String>,

    /// Only sync these extensions (e.g., ".jpg,.png")
    #[arg(long, value_delimiter = ',')]
    include: Vec<String>,

    /// Never sync these extensions
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Copy,
    Overwrite,
    Duplicate,
    Skip,
}

impl From<ActionArg> for SyncAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Copy => SyncAction::Copy,
            ActionArg::Overwrite => SyncAction::Overwrite,
            ActionArg::Duplicate => SyncAction::Duplicate,
            ActionArg::Skip => SyncAction::Skip,
        }
    }
}

/// Settings read from a TOML file. Command-line flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    check_hash: Option<bool>,
    hash_threshold: Option<String>,
    include: Vec<String>,
    exclude: Vec<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Sync {
            compare,
            forward,
            reverse,
        } => {
            let config = build_config(&compare, &settings)?;
            run_sync(config, forward, reverse)?;
        }
        Command::Diff { compare, format } => {
            let config = build_config(&compare, &settings)?;
            run_diff(&config, format)?;
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so they never interleave with the preview.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read the settings file, if any.
///
/// An explicit `--config` path must exist; the default location is optional.
fn load_settings(explicit: Option<&Path>) -> Result<FileSettings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match dirs::config_dir().map(|d| d.join("twinsync").join("config.toml")) {
            Some(path) if path.is_file() => path,
            _ => return Ok(FileSettings::default()),
        },
    };

    debug!(path = %path.display(), "loading settings");
    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    parse_settings(&text).with_context(|| format!("Invalid settings file {}", path.display()))
}

fn parse_settings(text: &str) -> Result<FileSettings> {
    Ok(toml::from_str(text)?)
}

/// Layer defaults, file settings and flags into a validated config.
fn build_config(args: &CompareArgs, settings: &FileSettings) -> Result<SyncConfig> {
    let hash_threshold = match args
        .hash_threshold
        .as_deref()
        .or(settings.hash_threshold.as_deref())
    {
        Some(expr) => parse_size(expr)?,
        None => DEFAULT_HASH_THRESHOLD,
    };
    let check_hash = !args.no_check_hash && settings.check_hash.unwrap_or(true);
    let include = if args.include.is_empty() {
        settings.include.clone()
    } else {
        args.include.clone()
    };
    let exclude = if args.exclude.is_empty() {
        settings.exclude.clone()
    } else {
        args.exclude.clone()
    };

    let config = SyncConfig::builder()
        .source(args.source.clone())
        .destination(args.destination.clone())
        .check_hash(check_hash)
        .hash_threshold(hash_threshold)
        .include_extensions(include)
        .exclude_extensions(exclude)
        .build()
        .context("Invalid sync settings")?;
    Ok(config)
}

/// Run both phases, prompting unless both actions were given.
fn run_sync(
    config: SyncConfig,
    forward: Option<ActionArg>,
    reverse: Option<ActionArg>,
) -> Result<()> {
    let out = std::io::stdout();
    let summary = match (forward, reverse) {
        (Some(forward), Some(reverse)) => {
            let prompt = FixedActions::new(forward.into(), reverse.into())?;
            SyncOrchestrator::new(config, prompt, out).run()
        }
        (None, None) => SyncOrchestrator::new(config, stdio_prompt(), out).run(),
        _ => bail!("--forward and --reverse must be given together"),
    }
    .context("Sync failed")?;

    debug!(?summary, "done");
    Ok(())
}

/// Print what a sync would do.
fn run_diff(config: &SyncConfig, format: OutputFormat) -> Result<()> {
    eprintln!(
        "Comparing {} and {}...",
        config.source.display(),
        config.destination.display()
    );

    let report = diff_folders(config).context("Diff failed")?;

    match format {
        OutputFormat::Text => {
            report.render(&mut std::io::stdout().lock())?;
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CompareArgs {
        let mut argv = vec!["twinsync", "diff", "/src", "/dst"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Diff { compare, .. } => compare,
            Command::Sync { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = build_config(&args(&[]), &FileSettings::default()).unwrap();
        assert!(config.check_hash);
        assert_eq!(config.hash_threshold, DEFAULT_HASH_THRESHOLD);
        assert!(config.include_extensions.is_empty());
    }

    #[test]
    fn test_flags_override_file() {
        let settings = parse_settings(
            r#"
            check_hash = true
            hash_threshold = "1GB"
            include = [".jpg"]
            exclude = [".tmp"]
            "#,
        )
        .unwrap();

        let config = build_config(
            &args(&["--no-check-hash", "--hash-threshold", "500MB", "--include", ".png,.gif"]),
            &settings,
        )
        .unwrap();

        assert!(!config.check_hash);
        assert_eq!(config.hash_threshold, 500 * 1024 * 1024);
        assert_eq!(config.include_extensions, vec![".png", ".gif"]);
        assert_eq!(config.exclude_extensions, vec![".tmp"]);
    }

    #[test]
    fn test_file_values_used_without_flags() {
        let settings = parse_settings("check_hash = false\nhash_threshold = \"2kb\"").unwrap();
        let config = build_config(&args(&[]), &settings).unwrap();
        assert!(!config.check_hash);
        assert_eq!(config.hash_threshold, 2048);
    }

    #[test]
    fn test_bad_threshold_fails_early() {
        assert!(build_config(&args(&["--hash-threshold", "lots"]), &FileSettings::default()).is_err());
    }

    #[test]
    fn test_unknown_setting_rejected() {
        assert!(parse_settings("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "hash_threshold = \"64kb\"\nexclude = [\".tmp\"]\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        let config = build_config(&args(&[]), &settings).unwrap();
        assert_eq!(config.hash_threshold, 64 * 1024);
        assert_eq!(config.exclude_extensions, vec![".tmp"]);
        assert!(config.check_hash);
    }

    #[test]
    fn test_missing_explicit_settings_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_settings(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_sync_action_flags() {
        let cli = Cli::try_parse_from([
            "twinsync", "sync", "/a", "/b", "--forward", "overwrite", "--reverse", "duplicate",
        ])
        .unwrap();
        match cli.command {
            Command::Sync {
                forward, reverse, ..
            } => {
                assert_eq!(SyncAction::from(forward.unwrap()), SyncAction::Overwrite);
                assert_eq!(SyncAction::from(reverse.unwrap()), SyncAction::Duplicate);
            }
            Command::Diff { .. } => unreachable!(),
        }
    }
}
