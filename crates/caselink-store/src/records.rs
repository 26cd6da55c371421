//! Record sources stored as JSON lines.
//!
//! Each source type has its own file (`emails.jsonl`, `calls.jsonl`,
//! `documents.jsonl`) holding one untagged record per line. Blank lines
//! are skipped; lines that do not parse are rejected individually.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use caselink_ingest::InputError;
use caselink_model::{CallRecord, DocumentRecord, EmailRecord, ExternalRecord, SourceKind};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Result, StoreError};

/// File name of a source inside the data directory.
pub fn source_file_name(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Email => "emails.jsonl",
        SourceKind::Call => "calls.jsonl",
        SourceKind::Document => "documents.jsonl",
    }
}

/// Records read from one source, plus the lines that failed to parse.
#[derive(Debug, Default)]
pub struct RecordBatch {
    pub records: Vec<ExternalRecord>,
    pub rejected: Vec<InputError>,
}

/// Reads a JSON-lines source file.
///
/// A missing file is an empty source. Lines that are not valid UTF-8 are
/// rejected like lines that do not parse.
///
/// # Errors
///
/// Returns [`StoreError::SourceUnavailable`] if the file exists but cannot
/// be read.
pub fn read_records(path: &Path, kind: SourceKind) -> Result<RecordBatch> {
    let unavailable = |source: std::io::Error| StoreError::SourceUnavailable {
        kind,
        path: path.to_path_buf(),
        source,
    };
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(source = %kind, path = %path.display(), "record source file not found");
            return Ok(RecordBatch::default());
        }
        Err(err) => return Err(unavailable(err)),
    };

    let mut batch = RecordBatch::default();
    for (idx, bytes) in BufReader::new(file).split(b'\n').enumerate() {
        let bytes = bytes.map_err(&unavailable)?;
        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(err) => {
                batch.rejected.push(InputError::Malformed {
                    kind,
                    line: idx + 1,
                    message: err.utf8_error().to_string(),
                });
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line, kind) {
            Ok(record) => batch.records.push(record),
            Err(message) => batch.rejected.push(InputError::Malformed {
                kind,
                line: idx + 1,
                message,
            }),
        }
    }
    Ok(batch)
}

fn parse_line(line: &str, kind: SourceKind) -> std::result::Result<ExternalRecord, String> {
    match kind {
        SourceKind::Email => parse::<EmailRecord>(line).map(ExternalRecord::from),
        SourceKind::Call => parse::<CallRecord>(line).map(ExternalRecord::from),
        SourceKind::Document => parse::<DocumentRecord>(line).map(ExternalRecord::from),
    }
}

fn parse<T: DeserializeOwned>(line: &str) -> std::result::Result<T, String> {
    serde_json::from_str(line).map_err(|e| e.to_string())
}
