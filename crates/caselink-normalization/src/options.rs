//! Configuration options for normalization.

use serde::{Deserialize, Serialize};

/// Default minimum length of a significant token.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Options for name normalization and tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationOptions {
    /// Tokens shorter than this (in characters) are not significant.
    pub min_token_len: usize,

    /// Additional stoplist entries. Multi-word entries are matched as
    /// whole token sequences.
    pub extra_stopwords: Vec<String>,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            extra_stopwords: Vec::new(),
        }
    }
}

impl NormalizationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    #[must_use]
    pub fn with_extra_stopwords(mut self, words: Vec<String>) -> Self {
        self.extra_stopwords = words;
        self
    }
}
