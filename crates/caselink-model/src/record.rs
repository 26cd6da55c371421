//! External records ingested from third-party sources.
//!
//! Records arrive without a reliable foreign key to a case. Each variant
//! carries its own natural key (message id, call id, storage path) which
//! makes linkage writes idempotent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::NaturalKey;

/// Source type of an external record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Email,
    Call,
    Document,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::Email, Self::Call, Self::Document];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Call => "call",
            Self::Document => "document",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "call" => Ok(Self::Call),
            "document" => Ok(Self::Document),
            _ => Err(ModelError::UnknownSource(s.to_string())),
        }
    }
}

/// An e-mail message. Participants are raw header values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailRecord {
    pub message_id: String,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

/// A phone call log entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_id: String,
    /// The non-firm side of the call, as reported by the phone system.
    #[serde(default)]
    pub external_phone: Option<String>,
    #[serde(default)]
    pub caller_name: Option<String>,
}

/// A filesystem document or folder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub storage_path: String,
    #[serde(default)]
    pub original_path: Option<String>,
    #[serde(default)]
    pub folder_label: Option<String>,
}

/// A record from any supported source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ExternalRecord {
    Email(EmailRecord),
    Call(CallRecord),
    Document(DocumentRecord),
}

impl ExternalRecord {
    pub fn source(&self) -> SourceKind {
        match self {
            Self::Email(_) => SourceKind::Email,
            Self::Call(_) => SourceKind::Call,
            Self::Document(_) => SourceKind::Document,
        }
    }

    fn raw_key(&self) -> &str {
        match self {
            Self::Email(record) => &record.message_id,
            Self::Call(record) => &record.call_id,
            Self::Document(record) => &record.storage_path,
        }
    }

    /// Returns the record's natural key.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidNaturalKey`] when the identifying field
    /// is blank.
    pub fn natural_key(&self) -> Result<NaturalKey, ModelError> {
        NaturalKey::new(self.source(), self.raw_key())
    }
}

impl From<EmailRecord> for ExternalRecord {
    fn from(record: EmailRecord) -> Self {
        Self::Email(record)
    }
}

impl From<CallRecord> for ExternalRecord {
    fn from(record: CallRecord) -> Self {
        Self::Call(record)
    }
}

impl From<DocumentRecord> for ExternalRecord {
    fn from(record: DocumentRecord) -> Self {
        Self::Document(record)
    }
}
