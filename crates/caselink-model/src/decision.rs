//! Resolver output and persisted linkage state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CaseId, NaturalKey};

/// A case proposed by one strategy. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub case_id: CaseId,
    pub strategy: &'static str,
}

/// The resolver's verdict for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageDecision {
    pub natural_key: NaturalKey,
    pub case_id: Option<CaseId>,
    pub strategy: Option<String>,
    /// Normalized primary label, kept for triage of unmatched records.
    pub label: Option<String>,
}

impl LinkageDecision {
    pub fn matched(natural_key: NaturalKey, candidate: MatchCandidate, label: Option<String>) -> Self {
        Self {
            natural_key,
            case_id: Some(candidate.case_id),
            strategy: Some(candidate.strategy.to_string()),
            label,
        }
    }

    pub fn unmatched(natural_key: NaturalKey, label: Option<String>) -> Self {
        Self {
            natural_key,
            case_id: None,
            strategy: None,
            label,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.case_id.is_some()
    }
}

/// Who established a stored linkage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOrigin {
    #[default]
    Automated,
    /// Set or corrected by an operator.
    Manual,
}

/// Stored linkage of one record to one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkageEntry {
    pub case_id: CaseId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default)]
    pub origin: LinkOrigin,
    pub linked_at: DateTime<Utc>,
}
