//! Error types for normalization setup.
//!
//! Normalization functions themselves are total; only compiling
//! operator-supplied patterns can fail.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizationError {
    /// A configured code pattern is not a valid regular expression.
    #[error("invalid {name} pattern {pattern:?}: {source}")]
    InvalidPattern {
        name: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, NormalizationError>;
