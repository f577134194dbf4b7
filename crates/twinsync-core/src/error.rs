//! Error types for sync operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while scanning, diffing or applying.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A size expression such as "2GB" could not be parsed.
    #[error("Invalid size expression: '{input}' (expected e.g. 2GB, 500MB or a byte count)")]
    InvalidSizeExpression { input: String },

    /// A scan root is missing or is not a directory.
    #[error("Root not found or not a directory: {path}")]
    RootNotFound { path: PathBuf },

    /// Reading a file for its content digest failed.
    #[error("Failed to hash {path}: {source}")]
    HashComputationFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a file failed. Copies made earlier in the pass remain.
    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The requested action is not allowed in this phase.
    #[error("Action '{action}' is not permitted in the {direction} phase")]
    ActionNotPermitted { action: String, direction: String },

    /// The operator input stream failed or closed.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Writing the console output failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a prompt error.
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// A symbolic link was skipped (links are never followed).
    SymlinkSkipped,
    /// Error reading file/directory.
    ReadError,
    /// Error reading metadata.
    MetadataError,
}

/// Non-fatal warning encountered during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a skipped symlink warning.
    pub fn symlink_skipped(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Symbolic link not followed: {}", path.display()),
            path,
            kind: WarningKind::SymlinkSkipped,
        }
    }

    /// Create a read error warning, classifying permission failures.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let kind = if error.kind() == std::io::ErrorKind::PermissionDenied {
            WarningKind::PermissionDenied
        } else {
            WarningKind::ReadError
        };
        Self {
            message: format!("Read error: {error}"),
            path: path.into(),
            kind,
        }
    }
}
