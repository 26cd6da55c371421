//! Case registry loading from `cases.csv`.

use std::fs::File;
use std::path::Path;

use caselink_model::{Case, CaseId};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::{Result, StoreError};

/// Row of `cases.csv`. Optional columns may be absent or blank.
#[derive(Debug, Deserialize)]
struct CaseCsvRow {
    id: String,
    display_name: String,
    #[serde(default)]
    reference_code: String,
    #[serde(default)]
    primary_phone: String,
    #[serde(default)]
    primary_email: String,
    #[serde(default)]
    claim_number: String,
    #[serde(default)]
    insurer: String,
}

/// Reads every case from a registry CSV file.
///
/// # Errors
///
/// Returns [`StoreError::RegistryUnavailable`] if the file cannot be
/// opened, [`StoreError::Csv`] on malformed CSV and
/// [`StoreError::InvalidCase`] for a row without an id.
pub fn load_cases(path: &Path) -> Result<Vec<Case>> {
    let file = File::open(path).map_err(|source| StoreError::RegistryUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut cases = Vec::new();
    for (idx, result) in reader.deserialize::<CaseCsvRow>().enumerate() {
        let row = result.map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // Header is row 1.
        let row_number = idx + 2;
        let id = CaseId::new(row.id).map_err(|e| StoreError::InvalidCase {
            path: path.to_path_buf(),
            row: row_number,
            message: e.to_string(),
        })?;
        cases.push(Case {
            id,
            display_name: row.display_name.trim().to_string(),
            reference_code: non_empty(&row.reference_code),
            primary_phone: non_empty(&row.primary_phone),
            primary_email: non_empty(&row.primary_email),
            claim_number: non_empty(&row.claim_number),
            insurer: non_empty(&row.insurer),
        });
    }

    tracing::info!(path = %path.display(), case_count = cases.len(), "loaded case registry");
    Ok(cases)
}

/// SHA-256 of the canonical JSON form of the id-sorted registry.
///
/// Two runs that report the same fingerprint resolved against the same
/// registry content, whatever the row order of the CSV file.
pub fn registry_fingerprint(cases: &[Case]) -> String {
    let mut sorted: Vec<&Case> = cases.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut hasher = Sha256::new();
    for case in sorted {
        // Serializing a plain struct of strings cannot fail.
        if let Ok(bytes) = serde_json::to_vec(case) {
            hasher.update(&bytes);
        }
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn registry(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_with_optional_columns() {
        let file = registry(
            "id,display_name,reference_code,primary_phone,primary_email,claim_number,insurer\n\
             c1,\"Smith, John\",LIT-1,502-555-1234,,,\n\
             c2,Acme Widgets,, , jane@acme.example ,CLM-1,Mutual\n",
        );
        let cases = load_cases(file.path()).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].display_name, "Smith, John");
        assert_eq!(cases[0].primary_email, None);
        assert_eq!(cases[1].primary_phone, None);
        assert_eq!(cases[1].primary_email.as_deref(), Some("jane@acme.example"));
        assert_eq!(cases[1].insurer.as_deref(), Some("Mutual"));
    }

    #[test]
    fn blank_id_is_reported_with_row_number() {
        let file = registry("id,display_name\nc1,A\n ,B\n");
        let err = load_cases(file.path()).unwrap_err();
        assert!(matches!(err, StoreError::InvalidCase { row: 3, .. }));
    }

    #[test]
    fn missing_registry_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_cases(&dir.path().join("cases.csv")).unwrap_err();
        assert!(matches!(err, StoreError::RegistryUnavailable { .. }));
    }

    #[test]
    fn fingerprint_ignores_row_order() {
        let a = Case::new(CaseId::new("c1").unwrap(), "A");
        let b = Case::new(CaseId::new("c2").unwrap(), "B");
        let forward = registry_fingerprint(&[a.clone(), b.clone()]);
        assert_eq!(forward, registry_fingerprint(&[b, a.clone()]));
        assert_eq!(forward.len(), 64);
        assert_ne!(forward, registry_fingerprint(&[a]));
    }
}
