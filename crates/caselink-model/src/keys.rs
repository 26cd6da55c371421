//! The common key set every source adapter produces.

use serde::{Deserialize, Serialize};

/// Resolvable keys extracted from one external record.
///
/// All values are already normalized by the adapter. Each list keeps
/// insertion order and holds no duplicates; the first name is the
/// record's primary label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub names: Vec<String>,
    pub ref_codes: Vec<String>,
    pub claim_numbers: Vec<String>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_email(&mut self, value: impl Into<String>) {
        push_unique(&mut self.emails, value.into());
    }

    pub fn add_phone(&mut self, value: impl Into<String>) {
        push_unique(&mut self.phones, value.into());
    }

    pub fn add_name(&mut self, value: impl Into<String>) {
        push_unique(&mut self.names, value.into());
    }

    pub fn add_ref_code(&mut self, value: impl Into<String>) {
        push_unique(&mut self.ref_codes, value.into());
    }

    pub fn add_claim_number(&mut self, value: impl Into<String>) {
        push_unique(&mut self.claim_numbers, value.into());
    }

    /// Label reported for unmatched records: the first name, falling back
    /// to the first e-mail or phone.
    pub fn primary_label(&self) -> Option<&str> {
        self.names
            .first()
            .or_else(|| self.emails.first())
            .or_else(|| self.phones.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
            && self.phones.is_empty()
            && self.names.is_empty()
            && self.ref_codes.is_empty()
            && self.claim_numbers.is_empty()
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if value.is_empty() || values.contains(&value) {
        return;
    }
    values.push(value);
}
