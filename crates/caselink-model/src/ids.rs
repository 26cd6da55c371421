#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::ModelError;
use crate::record::SourceKind;

/// Identifier of a canonical case in the registry.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct CaseId(String);

impl CaseId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidCaseId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CaseId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CaseId> for String {
    fn from(value: CaseId) -> Self {
        value.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value inherent to a record that makes linkage writes idempotent.
///
/// Rendered as `<source>:<value>`, e.g. `email:<abc@mail>` or
/// `document:Smith, John/intake.pdf`.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct NaturalKey {
    source: SourceKind,
    value: String,
}

impl NaturalKey {
    /// The value is kept verbatim; only an all-whitespace value is
    /// rejected.
    pub fn new(source: SourceKind, value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ModelError::InvalidNaturalKey(format!("{source}:{value}")));
        }
        Ok(Self { source, value })
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for NaturalKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, value) = s
            .split_once(':')
            .ok_or_else(|| ModelError::InvalidNaturalKey(s.to_string()))?;
        let source: SourceKind = source.parse()?;
        Self::new(source, value)
    }
}

impl TryFrom<String> for NaturalKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NaturalKey> for String {
    fn from(value: NaturalKey) -> Self {
        value.to_string()
    }
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.value)
    }
}
