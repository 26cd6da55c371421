//! Reference code and claim number extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{NormalizationError, Result};

/// Default case reference code pattern, e.g. `LIT-2023-0042` or `PI-1043`.
pub const DEFAULT_REFERENCE_PATTERN: &str = r"\b[A-Za-z]{2,5}-\d{2,6}(?:-\d{1,6})?\b";

/// Default claim number pattern. The identifier is capture group 1.
pub const DEFAULT_CLAIM_PATTERN: &str =
    r"(?i)\b(?:claim|clm)\.?\s*(?:no\.?|number|num|#)?\s*[:#]?\s*([A-Z0-9][A-Z0-9-]{4,})";

static DEFAULT_REFERENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_REFERENCE_PATTERN).expect("Invalid reference regex"));

static DEFAULT_CLAIM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_CLAIM_PATTERN).expect("Invalid claim regex"));

/// Normalizes a reference code or claim number for exact comparison:
/// uppercase ASCII alphanumerics only.
pub fn normalize_code(raw: &str) -> Option<String> {
    let code: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    if code.is_empty() { None } else { Some(code) }
}

/// Configurable code patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodePatterns {
    pub reference_pattern: String,
    pub claim_pattern: String,
}

impl Default for CodePatterns {
    fn default() -> Self {
        Self {
            reference_pattern: DEFAULT_REFERENCE_PATTERN.to_string(),
            claim_pattern: DEFAULT_CLAIM_PATTERN.to_string(),
        }
    }
}

/// Scans free text for reference codes and claim numbers.
#[derive(Debug, Clone)]
pub struct CodeScanner {
    reference: Regex,
    claim: Regex,
}

impl Default for CodeScanner {
    fn default() -> Self {
        Self {
            reference: DEFAULT_REFERENCE_REGEX.clone(),
            claim: DEFAULT_CLAIM_REGEX.clone(),
        }
    }
}

impl CodeScanner {
    /// Compiles the configured patterns.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizationError::InvalidPattern`] if either pattern
    /// fails to compile.
    pub fn new(patterns: &CodePatterns) -> Result<Self> {
        Ok(Self {
            reference: compile("reference", &patterns.reference_pattern)?,
            claim: compile("claim", &patterns.claim_pattern)?,
        })
    }

    /// Normalized reference codes found in `text`, sorted and unique.
    pub fn reference_codes(&self, text: &str) -> Vec<String> {
        let mut codes: Vec<String> = self
            .reference
            .find_iter(text)
            .filter_map(|m| normalize_code(m.as_str()))
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }

    /// Normalized claim numbers found in `text`, sorted and unique.
    ///
    /// Uses capture group 1 when the pattern has one, and ignores matches
    /// without a digit.
    pub fn claim_numbers(&self, text: &str) -> Vec<String> {
        let mut numbers: Vec<String> = self
            .claim
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .filter(|m| m.as_str().chars().any(|ch| ch.is_ascii_digit()))
            .filter_map(|m| normalize_code(m.as_str()))
            .collect();
        numbers.sort();
        numbers.dedup();
        numbers
    }
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| NormalizationError::InvalidPattern {
        name,
        pattern: pattern.to_string(),
        source,
    })
}
