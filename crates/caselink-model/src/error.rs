use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid case id: {0:?}")]
    InvalidCaseId(String),
    #[error("invalid natural key: {0:?}")]
    InvalidNaturalKey(String),
    #[error("unknown record source: {0:?}")]
    UnknownSource(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
