//! Phone call adapter.

use std::collections::BTreeSet;

use caselink_model::{ExternalRecord, KeySet, SourceKind};
use caselink_normalization::{NameNormalizer, normalize_phone};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::adapter::{SourceAdapter, require_key, wrong_source};
use crate::error::Result;

/// Caller-ID placeholders that carry no identity.
const PLACEHOLDER_CALLER_NAMES: &[&str] = &[
    "unknown",
    "unknown caller",
    "anonymous",
    "wireless caller",
    "private",
    "private caller",
    "restricted",
    "unavailable",
    "toll free",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallOptions {
    /// The firm's own numbers. Never used as identity keys.
    pub internal_numbers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CallAdapter {
    internal_numbers: BTreeSet<String>,
    names: NameNormalizer,
}

impl CallAdapter {
    pub fn new(options: &CallOptions, names: NameNormalizer) -> Self {
        let mut internal_numbers = BTreeSet::new();
        for number in &options.internal_numbers {
            match normalize_phone(number) {
                Some(phone) => {
                    internal_numbers.insert(phone);
                }
                None => warn!(number = %number, "ignoring unparseable internal number"),
            }
        }
        Self {
            internal_numbers,
            names,
        }
    }

    fn caller_label(&self, raw: &str) -> Option<String> {
        if normalize_phone(raw).is_some() {
            return None;
        }
        let label = self.names.normalize(raw);
        if label.is_empty() || PLACEHOLDER_CALLER_NAMES.contains(&label.as_str()) {
            return None;
        }
        Some(label)
    }
}

impl SourceAdapter for CallAdapter {
    fn source(&self) -> SourceKind {
        SourceKind::Call
    }

    fn extract(&self, record: &ExternalRecord) -> Result<KeySet> {
        let ExternalRecord::Call(call) = record else {
            return Err(wrong_source(SourceKind::Call, record));
        };
        require_key(record, "call_id")?;

        let mut keys = KeySet::new();
        if let Some(phone) = call.external_phone.as_deref().and_then(normalize_phone)
            && !self.internal_numbers.contains(&phone)
        {
            keys.add_phone(phone);
        }
        // The display name is the fallback label when the number is unknown.
        if let Some(label) = call.caller_name.as_deref().and_then(|n| self.caller_label(n)) {
            keys.add_name(label);
        }
        Ok(keys)
    }
}
