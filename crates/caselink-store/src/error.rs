//! Store error types.
//!
//! Registry, source and lock errors are fatal to a run. Errors from a
//! single linkage batch are reported and the run continues.

use std::path::PathBuf;

use caselink_model::SourceKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The data directory does not exist.
    #[error("data directory not found: {path}")]
    DataDirMissing { path: PathBuf },

    /// The case registry cannot be read.
    #[error("case registry unavailable: {path}")]
    RegistryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The case registry is not valid CSV.
    #[error("failed to parse case registry: {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A registry row cannot become a case.
    #[error("invalid case at row {row} of {path}: {message}")]
    InvalidCase {
        path: PathBuf,
        row: usize,
        message: String,
    },

    /// A record source exists but cannot be read.
    #[error("{kind} record source unavailable: {path}")]
    SourceUnavailable {
        kind: SourceKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The linkage file is not valid JSON.
    #[error("failed to parse linkage file: {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not replace the target.
    #[error("failed to replace {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another committing run holds the lock.
    #[error("another run holds the lock {path}; remove the file if no run is active")]
    LockHeld { path: PathBuf },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
