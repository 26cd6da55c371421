//! Store interfaces and the file-backed implementation.
//!
//! The linkage engine reads cases and records and writes linkages through
//! three small traits. [`FileStore`] implements all of them over a data
//! directory:
//!
//! ```text
//! <data-dir>/
//!   cases.csv          case registry
//!   emails.jsonl       e-mail records
//!   calls.jsonl        call records
//!   documents.jsonl    document records
//!   linkages.json      natural key -> linkage
//!   .caselink.lock     present while a committing run is active
//! ```

use std::path::{Path, PathBuf};

use caselink_model::{Case, SourceKind};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::linkages::{Linkages, read_linkages, write_linkages};
use crate::lock::{LOCK_FILE_NAME, RunLock};
use crate::records::{RecordBatch, read_records, source_file_name};
use crate::registry::load_cases;
use crate::writer::LinkagePatch;

pub const CASES_FILE_NAME: &str = "cases.csv";
pub const LINKAGES_FILE_NAME: &str = "linkages.json";

/// Read access to the canonical case list.
pub trait CaseRegistry {
    /// # Errors
    ///
    /// Any error means the registry is unavailable and the run must stop.
    fn load_cases(&self) -> Result<Vec<Case>>;
}

/// Read access to the records of one source type.
pub trait RecordSource {
    /// # Errors
    ///
    /// Any error means the source is unavailable and the run must stop.
    /// Individual unreadable records are returned in
    /// [`RecordBatch::rejected`] instead.
    fn load_records(&self, kind: SourceKind) -> Result<RecordBatch>;
}

/// Linkage persistence.
pub trait LinkageStore {
    fn linkages(&self) -> Result<Linkages>;

    /// Applies one batch of upserts. Either every patch is applied or none.
    fn apply_batch(&mut self, patches: &[LinkagePatch]) -> Result<()>;
}

/// Which records a run considers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordScope {
    /// Records without a stored linkage.
    #[default]
    Unlinked,
    /// Every record, for re-resolution.
    All,
}

impl RecordScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unlinked => "unlinked",
            Self::All => "all",
        }
    }
}

/// Drops already linked records when the scope is [`RecordScope::Unlinked`].
///
/// Records whose natural key is invalid are kept so the adapter can
/// reject them.
pub fn apply_scope(batch: RecordBatch, linkages: &Linkages, scope: RecordScope) -> RecordBatch {
    match scope {
        RecordScope::All => batch,
        RecordScope::Unlinked => RecordBatch {
            records: batch
                .records
                .into_iter()
                .filter(|record| {
                    !record
                        .natural_key()
                        .is_ok_and(|key| linkages.contains_key(&key))
                })
                .collect(),
            rejected: batch.rejected,
        },
    }
}

/// Store over a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Opens an existing data directory.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DataDirMissing`] if `data_dir` is not a
    /// directory.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.is_dir() {
            return Err(StoreError::DataDirMissing { path: data_dir });
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cases_path(&self) -> PathBuf {
        self.data_dir.join(CASES_FILE_NAME)
    }

    pub fn source_path(&self, kind: SourceKind) -> PathBuf {
        self.data_dir.join(source_file_name(kind))
    }

    pub fn linkages_path(&self) -> PathBuf {
        self.data_dir.join(LINKAGES_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(LOCK_FILE_NAME)
    }

    /// Takes the advisory run lock.
    ///
    /// # Errors
    ///
    /// See [`RunLock::acquire`].
    pub fn lock(&self) -> Result<RunLock> {
        RunLock::acquire(&self.lock_path())
    }
}

impl CaseRegistry for FileStore {
    fn load_cases(&self) -> Result<Vec<Case>> {
        load_cases(&self.cases_path())
    }
}

impl RecordSource for FileStore {
    fn load_records(&self, kind: SourceKind) -> Result<RecordBatch> {
        read_records(&self.source_path(kind), kind)
    }
}

impl LinkageStore for FileStore {
    fn linkages(&self) -> Result<Linkages> {
        read_linkages(&self.linkages_path())
    }

    fn apply_batch(&mut self, patches: &[LinkagePatch]) -> Result<()> {
        let path = self.linkages_path();
        let mut linkages = read_linkages(&path)?;
        for patch in patches {
            linkages.insert(patch.natural_key.clone(), patch.entry.clone());
        }
        write_linkages(&path, &linkages)
    }
}

/// In-memory linkage store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub linkages: Linkages,
    /// Number of batches applied.
    pub batches_applied: usize,
}

impl LinkageStore for MemoryStore {
    fn linkages(&self) -> Result<Linkages> {
        Ok(self.linkages.clone())
    }

    fn apply_batch(&mut self, patches: &[LinkagePatch]) -> Result<()> {
        for patch in patches {
            self.linkages
                .insert(patch.natural_key.clone(), patch.entry.clone());
        }
        self.batches_applied += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use caselink_model::{CallRecord, CaseId, ExternalRecord, LinkOrigin, LinkageEntry, NaturalKey};
    use chrono::Utc;
    use tempfile::tempdir;

    use super::*;

    fn call(id: &str) -> ExternalRecord {
        CallRecord {
            call_id: id.to_string(),
            ..CallRecord::default()
        }
        .into()
    }

    #[test]
    fn unlinked_scope_skips_linked_records() {
        let mut linkages = Linkages::new();
        linkages.insert(
            NaturalKey::new(SourceKind::Call, "c1").unwrap(),
            LinkageEntry {
                case_id: CaseId::new("k").unwrap(),
                strategy: None,
                origin: LinkOrigin::Manual,
                linked_at: Utc::now(),
            },
        );
        let batch = RecordBatch {
            records: vec![call("c1"), call("c2"), call(" ")],
            rejected: Vec::new(),
        };

        let scoped = apply_scope(batch, &linkages, RecordScope::Unlinked);
        assert_eq!(scoped.records, vec![call("c2"), call(" ")]);

        let batch = RecordBatch {
            records: vec![call("c1")],
            rejected: Vec::new(),
        };
        assert_eq!(apply_scope(batch, &linkages, RecordScope::All).records.len(), 1);
    }

    #[test]
    fn open_requires_existing_directory() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.cases_path(), dir.path().join("cases.csv"));
        assert_eq!(
            store.source_path(SourceKind::Document),
            dir.path().join("documents.jsonl")
        );

        let err = FileStore::open(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, StoreError::DataDirMissing { .. }));
    }
}
