//! Canonical case entity.

use serde::{Deserialize, Serialize};

use crate::ids::CaseId;

/// A case from the registry. Read-only ground truth for linkage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurer: Option<String>,
}

impl Case {
    /// Creates a case with only an id and display name set.
    pub fn new(id: CaseId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            reference_code: None,
            primary_phone: None,
            primary_email: None,
            claim_number: None,
            insurer: None,
        }
    }

    #[must_use]
    pub fn with_reference_code(mut self, code: impl Into<String>) -> Self {
        self.reference_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.primary_phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.primary_email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_claim_number(mut self, claim: impl Into<String>) -> Self {
        self.claim_number = Some(claim.into());
        self
    }

    #[must_use]
    pub fn with_insurer(mut self, insurer: impl Into<String>) -> Self {
        self.insurer = Some(insurer.into());
        self
    }
}
