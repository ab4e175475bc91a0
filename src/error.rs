//! Error types for httpscout.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe failures never
//! appear here: they are folded into [`crate::scanner::ErrorKind`] on the
//! probe outcome and never cross the probe boundary.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::types::TargetError;

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}

/// Errors raised while writing report artifacts.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
}

/// Top-level error for command execution.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type alias for command execution.
pub type CliResult<T> = Result<T, CliError>;
