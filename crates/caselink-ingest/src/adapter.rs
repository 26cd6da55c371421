//! Source adapter trait and dispatch.
//!
//! Adapters translate source-specific payloads into the common [`KeySet`].
//! They only extract and normalize keys; matching belongs to the resolver.

use caselink_model::{ExternalRecord, KeySet, SourceKind};
use caselink_normalization::{CodeScanner, NameNormalizer};
use serde::{Deserialize, Serialize};

use crate::call::{CallAdapter, CallOptions};
use crate::document::{DocumentAdapter, DocumentOptions};
use crate::email::{EmailAdapter, EmailOptions};
use crate::error::{InputError, Result};

/// Extracts a key set from records of one source type.
pub trait SourceAdapter: Send + Sync {
    /// The record source this adapter handles.
    fn source(&self) -> SourceKind;

    /// Extracts the resolvable keys of `record`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the record belongs to another source or
    /// lacks its natural key.
    fn extract(&self, record: &ExternalRecord) -> Result<KeySet>;
}

/// Options for all adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    pub email: EmailOptions,
    pub call: CallOptions,
    pub document: DocumentOptions,
}

/// One adapter per source, dispatched by record type.
#[derive(Debug, Clone)]
pub struct Adapters {
    email: EmailAdapter,
    call: CallAdapter,
    document: DocumentAdapter,
}

impl Default for Adapters {
    fn default() -> Self {
        Self::new(
            &AdapterOptions::default(),
            &NameNormalizer::default(),
            &CodeScanner::default(),
        )
    }
}

impl Adapters {
    pub fn new(options: &AdapterOptions, names: &NameNormalizer, codes: &CodeScanner) -> Self {
        Self {
            email: EmailAdapter::new(&options.email, names.clone(), codes.clone()),
            call: CallAdapter::new(&options.call, names.clone()),
            document: DocumentAdapter::new(&options.document, names.clone(), codes.clone()),
        }
    }

    /// Returns the adapter for a source.
    pub fn get(&self, source: SourceKind) -> &dyn SourceAdapter {
        match source {
            SourceKind::Email => &self.email,
            SourceKind::Call => &self.call,
            SourceKind::Document => &self.document,
        }
    }

    /// Extracts keys with the adapter matching the record's source.
    pub fn extract(&self, record: &ExternalRecord) -> Result<KeySet> {
        self.get(record.source()).extract(record)
    }
}

/// Checks that the record has a natural key, mapping failures to
/// [`InputError::MissingKey`].
pub(crate) fn require_key(record: &ExternalRecord, field: &'static str) -> Result<()> {
    record
        .natural_key()
        .map(|_| ())
        .map_err(|_| InputError::MissingKey {
            kind: record.source(),
            field,
        })
}

pub(crate) fn wrong_source(expected: SourceKind, record: &ExternalRecord) -> InputError {
    InputError::WrongSource {
        expected,
        found: record.source(),
    }
}
