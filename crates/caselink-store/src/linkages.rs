//! Linkage state persisted as `linkages.json`.
//!
//! The file is a JSON object keyed by natural key, so a record can hold at
//! most one linkage. Every write replaces the file atomically.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;

use caselink_model::{LinkageEntry, NaturalKey};

use crate::error::{Result, StoreError};

/// Stored linkages by record.
pub type Linkages = BTreeMap<NaturalKey, LinkageEntry>;

/// Reads the linkage file. A missing file means nothing is linked yet.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read and
/// [`StoreError::Json`] if it is not a valid linkage map.
pub fn read_linkages(path: &Path) -> Result<Linkages> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Linkages::new()),
        Err(source) => {
            return Err(StoreError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(Linkages::new());
    }
    serde_json::from_str(&content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the linkage file through a temp file and rename.
///
/// # Errors
///
/// Returns [`StoreError::Io`] or [`StoreError::AtomicWriteFailed`]; the
/// previous file content is untouched in both cases.
pub fn write_linkages(path: &Path, linkages: &Linkages) -> Result<()> {
    let json = serde_json::to_vec_pretty(linkages).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let temp_path = path.with_extension("json.tmp");
    let mut file = File::create(&temp_path).map_err(|source| StoreError::Io {
        operation: "create",
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(&json).map_err(|source| StoreError::Io {
        operation: "write",
        path: temp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| StoreError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| StoreError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), linkage_count = linkages.len(), "wrote linkages");
    Ok(())
}

#[cfg(test)]
mod tests {
    use caselink_model::{CaseId, LinkOrigin, SourceKind};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn write_then_read_keeps_one_entry_per_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("linkages.json");
        assert!(read_linkages(&path).unwrap().is_empty());

        let key = NaturalKey::new(SourceKind::Call, "c-1").unwrap();
        let entry = LinkageEntry {
            case_id: CaseId::new("case-9").unwrap(),
            strategy: Some("identity".to_string()),
            origin: LinkOrigin::Automated,
            linked_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        };
        let mut linkages = Linkages::new();
        linkages.insert(key.clone(), entry.clone());
        write_linkages(&path, &linkages).unwrap();
        linkages.insert(key.clone(), entry.clone());
        write_linkages(&path, &linkages).unwrap();

        let stored = read_linkages(&path).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get(&key), Some(&entry));
        assert!(!path.with_extension("json.tmp").exists());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"call:c-1\""));
    }

    #[test]
    fn invalid_file_is_a_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("linkages.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            read_linkages(&path).unwrap_err(),
            StoreError::Json { .. }
        ));
    }
}
