//! Error types for index construction.

use caselink_model::CaseId;
use thiserror::Error;

/// Errors that prevent the case index from being built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Two registry rows share an id. The registry itself is inconsistent,
    /// so no linkage decision can be trusted.
    #[error("case registry contains duplicate case id '{0}'")]
    DuplicateCaseId(CaseId),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
