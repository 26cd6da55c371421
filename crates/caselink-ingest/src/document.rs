//! Document adapter.
//!
//! The case label of a document is a folder name taken from its original
//! storage path. Which folder depends on the layout: most case folders sit
//! at the top level, but archival containers (`Archive/`, `Closed Cases/`,
//! `2019/`) push them one level down. The layouts are described by an
//! ordered list of [`PathRule`]s; the first rule whose matcher accepts the
//! top-level segment decides which segment holds the label.

use caselink_model::{ExternalRecord, KeySet, SourceKind};
use caselink_normalization::{CodeScanner, NameNormalizer};
use serde::{Deserialize, Serialize};

use crate::adapter::{SourceAdapter, require_key, wrong_source};
use crate::error::Result;

const ARCHIVE_CONTAINERS: &[&str] = &["archive", "archives", "closed", "closed cases", "old cases"];

/// Longest file extension recognised when telling files from folders.
const MAX_EXTENSION_LEN: usize = 5;

/// Condition on the top-level path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentMatcher {
    /// Matches every path.
    Any,
    /// Matches when the top-level segment equals one of `names`,
    /// ignoring case.
    Named { names: Vec<String> },
    /// Matches a four-digit year folder.
    Year,
}

impl SegmentMatcher {
    pub fn matches(&self, segment: &str) -> bool {
        let segment = segment.trim();
        match self {
            Self::Any => true,
            Self::Named { names } => names
                .iter()
                .any(|name| name.trim().eq_ignore_ascii_case(segment)),
            Self::Year => {
                segment.len() == 4
                    && segment
                        .parse::<u16>()
                        .is_ok_and(|year| (1900..=2100).contains(&year))
            }
        }
    }
}

/// Declarative rule selecting the label segment of a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRule {
    pub name: String,
    pub matcher: SegmentMatcher,
    /// Zero-based index of the folder segment holding the case label.
    pub segment: usize,
}

impl PathRule {
    pub fn new(name: impl Into<String>, matcher: SegmentMatcher, segment: usize) -> Self {
        Self {
            name: name.into(),
            matcher,
            segment,
        }
    }
}

/// Default rules: archival containers and year folders, then top level.
pub fn default_path_rules() -> Vec<PathRule> {
    vec![
        PathRule::new(
            "archive",
            SegmentMatcher::Named {
                names: ARCHIVE_CONTAINERS.iter().map(|n| (*n).to_string()).collect(),
            },
            1,
        ),
        PathRule::new("year", SegmentMatcher::Year, 1),
        PathRule::new("top_level", SegmentMatcher::Any, 0),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    pub rules: Vec<PathRule>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            rules: default_path_rules(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentAdapter {
    rules: Vec<PathRule>,
    names: NameNormalizer,
    codes: CodeScanner,
}

impl DocumentAdapter {
    pub fn new(options: &DocumentOptions, names: NameNormalizer, codes: CodeScanner) -> Self {
        Self {
            rules: options.rules.clone(),
            names,
            codes,
        }
    }

    /// Raw folder label selected by the first matching rule.
    pub fn path_label<'a>(&self, path: &'a str) -> Option<&'a str> {
        let folders = folder_segments(path);
        let top = folders.first()?;
        let rule = self.rules.iter().find(|rule| rule.matcher.matches(top))?;
        folders.get(rule.segment).copied()
    }

    fn add_label(&self, keys: &mut KeySet, raw: &str) {
        for code in self.codes.reference_codes(raw) {
            keys.add_ref_code(code);
        }
        for claim in self.codes.claim_numbers(raw) {
            keys.add_claim_number(claim);
        }
        keys.add_name(self.names.normalize_folder_label(raw));
    }
}

impl SourceAdapter for DocumentAdapter {
    fn source(&self) -> SourceKind {
        SourceKind::Document
    }

    fn extract(&self, record: &ExternalRecord) -> Result<KeySet> {
        let ExternalRecord::Document(document) = record else {
            return Err(wrong_source(SourceKind::Document, record));
        };
        require_key(record, "storage_path")?;

        let mut keys = KeySet::new();
        if let Some(label) = document.folder_label.as_deref() {
            self.add_label(&mut keys, label);
        }
        let path = document
            .original_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .unwrap_or(&document.storage_path);
        if let Some(label) = self.path_label(path) {
            self.add_label(&mut keys, label);
        }
        Ok(keys)
    }
}

/// Folder segments of a path, excluding drive prefixes and a trailing
/// file name.
pub fn folder_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    if segments.first().is_some_and(|first| first.ends_with(':')) {
        segments.remove(0);
    }
    if segments.last().is_some_and(|last| looks_like_file(last)) {
        segments.pop();
    }
    segments
}

fn looks_like_file(segment: &str) -> bool {
    match segment.rsplit_once('.') {
        Some((stem, extension)) => {
            !stem.is_empty()
                && !extension.is_empty()
                && extension.len() <= MAX_EXTENSION_LEN
                && extension.chars().all(|ch| ch.is_ascii_alphanumeric())
                && extension.chars().any(|ch| ch.is_ascii_alphabetic())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use caselink_model::DocumentRecord;

    use super::*;

    fn adapter() -> DocumentAdapter {
        DocumentAdapter::new(
            &DocumentOptions::default(),
            NameNormalizer::default(),
            CodeScanner::default(),
        )
    }

    #[test]
    fn splits_paths_into_folders() {
        assert_eq!(
            folder_segments(r"C:\Clients\Smith, John\intake.pdf"),
            vec!["Clients", "Smith, John"]
        );
        assert_eq!(folder_segments("/Smith, John/"), vec!["Smith, John"]);
        assert_eq!(folder_segments("intake.pdf"), Vec::<&str>::new());
        assert_eq!(folder_segments("Acme Inc. v. Jones"), vec!["Acme Inc. v. Jones"]);
    }

    #[test]
    fn picks_label_segment_by_rule() {
        let adapter = adapter();
        assert_eq!(adapter.path_label("Smith, John/notes.docx"), Some("Smith, John"));
        assert_eq!(
            adapter.path_label("Closed Cases/Smith, John/notes.docx"),
            Some("Smith, John")
        );
        assert_eq!(adapter.path_label("2019/Smith, John/a.pdf"), Some("Smith, John"));
        assert_eq!(adapter.path_label("Archive/a.pdf"), None);
        assert_eq!(adapter.path_label("loose.pdf"), None);
    }

    #[test]
    fn prefers_original_path_and_explicit_label() {
        let record: ExternalRecord = DocumentRecord {
            storage_path: "blobs/9f/9f2c.bin".to_string(),
            original_path: Some("453 Laurel Rd Holdings LLC/lease.pdf".to_string()),
            folder_label: Some("Laurel Road Holdings".to_string()),
        }
        .into();
        let keys = adapter().extract(&record).unwrap();
        assert_eq!(keys.names, vec!["laurel road holdings", "laurel rd holdings"]);
    }

    #[test]
    fn year_matcher_requires_plausible_year() {
        assert!(SegmentMatcher::Year.matches("2019"));
        assert!(!SegmentMatcher::Year.matches("0453"));
        assert!(!SegmentMatcher::Year.matches("20190"));
    }
}
