//! Error types for record extraction.

use caselink_model::SourceKind;
use thiserror::Error;

/// A source record that cannot be processed. Skipped and counted, never
/// fatal to a run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The record lacks its identifying field.
    #[error("{kind} record is missing required field '{field}'")]
    MissingKey {
        kind: SourceKind,
        field: &'static str,
    },

    /// A record was routed to the adapter of another source.
    #[error("expected a {expected} record, got a {found} record")]
    WrongSource {
        expected: SourceKind,
        found: SourceKind,
    },

    /// A stored record could not be parsed.
    #[error("malformed {kind} record at line {line}: {message}")]
    Malformed {
        kind: SourceKind,
        line: usize,
        message: String,
    },
}

impl InputError {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::MissingKey { kind, .. } | Self::Malformed { kind, .. } => *kind,
            Self::WrongSource { found, .. } => *found,
        }
    }
}

/// Result type for extraction.
pub type Result<T> = std::result::Result<T, InputError>;
