use std::path::PathBuf;

use caselink_map::{AmbiguousKey, IndexStat};
use caselink_model::SourceKind;
use caselink_report::RunReport;
use caselink_store::{RecordScope, WriteMode, WriteSummary};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counts for one record source in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub source: SourceKind,
    /// Parsed records in the source file.
    pub loaded: usize,
    /// Records left after applying the scope.
    pub in_scope: usize,
    /// Records resolved (or rejected by the adapter) before the limit.
    pub processed: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Malformed lines plus records without a natural key.
    pub rejected: usize,
}

impl SourceSummary {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            loaded: 0,
            in_scope: 0,
            processed: 0,
            matched: 0,
            unmatched: 0,
            rejected: 0,
        }
    }
}

/// Outcome of `caselink run`, printed as text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub data_dir: PathBuf,
    pub mode: WriteMode,
    pub scope: RecordScope,
    pub limit: Option<usize>,
    pub case_count: usize,
    pub registry_fingerprint: String,
    /// Resolver chain in evaluation order.
    pub strategies: Vec<&'static str>,
    pub sources: Vec<SourceSummary>,
    /// Set when Ctrl-C stopped the run early.
    pub interrupted: bool,
    pub report: RunReport,
    pub write: WriteSummary,
}

impl RunSummary {
    pub fn input_errors(&self) -> usize {
        self.sources.iter().map(|source| source.rejected).sum()
    }
}

/// Outcome of `caselink index`.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub data_dir: PathBuf,
    pub case_count: usize,
    pub registry_fingerprint: String,
    pub stats: Vec<IndexStat>,
    pub ambiguous: Vec<AmbiguousKey>,
}
