//! Name normalization and tokenization.
//!
//! Names arrive in many shapes: "Smith, John", "JOHN SMITH", "Laurel Rd
//! Holdings, LLC", "Estate of Mary O'Brien". Normalization maps them to a
//! lowercase, space-separated form with corporate and legal boilerplate
//! removed so that equal names compare equal.

use crate::options::NormalizationOptions;

/// Corporate and legal boilerplate dropped from names.
///
/// Multi-word entries are matched as whole token sequences.
pub const NAME_STOPLIST: &[&str] = &[
    "the estate of",
    "estate of",
    "et al",
    "et ux",
    "inc",
    "incorporated",
    "llc",
    "llp",
    "lllp",
    "lp",
    "ltd",
    "limited",
    "corp",
    "corporation",
    "co",
    "company",
    "pllc",
    "pc",
    "pa",
    "plc",
    "dba",
    "deceased",
    "decd",
    "esq",
];

/// Tokens that never identify a case on their own.
pub const GENERIC_TOKENS: &[&str] = &[
    "and", "the", "for", "with", "from", "file", "files", "doc", "docs", "document",
    "documents", "misc", "case", "cases", "matter", "client", "clients", "copy", "new", "old",
    "scan", "scans", "email", "call", "folder", "records", "claim", "claims", "fwd",
];

/// Lowercases, strips punctuation, collapses whitespace and drops the
/// default stoplist.
///
/// Apostrophes and periods are deleted (`O'Brien` → `obrien`,
/// `L.L.C.` → `llc`); every other non-alphanumeric character becomes a
/// separator. If the stoplist would remove every token the unstripped form
/// is returned instead.
pub fn normalize_name(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}

/// Splits a normalized string on whitespace and keeps tokens of at least
/// `min_len` characters, without duplicates.
pub fn tokenize(normalized: &str, min_len: usize) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in normalized.split_whitespace() {
        if token.chars().count() < min_len {
            continue;
        }
        if tokens.iter().any(|existing| existing == token) {
            continue;
        }
        tokens.push(token.to_string());
    }
    tokens
}

/// Name normalizer configured with a stoplist and token length.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    /// Stoplist phrases as token sequences, longest first.
    stoplist: Vec<Vec<String>>,
    min_token_len: usize,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(&NormalizationOptions::default())
    }
}

impl NameNormalizer {
    pub fn new(options: &NormalizationOptions) -> Self {
        let mut stoplist: Vec<Vec<String>> = NAME_STOPLIST
            .iter()
            .map(|entry| (*entry).to_string())
            .chain(options.extra_stopwords.iter().cloned())
            .map(|entry| clean(&entry))
            .filter(|tokens| !tokens.is_empty())
            .collect();
        stoplist.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        stoplist.dedup();
        Self {
            stoplist,
            min_token_len: options.min_token_len.max(1),
        }
    }

    pub fn min_token_len(&self) -> usize {
        self.min_token_len
    }

    /// See [`normalize_name`].
    pub fn normalize(&self, raw: &str) -> String {
        let tokens = clean(raw);
        let mut kept: Vec<String> = tokens.clone();
        // Removing one entry can join the halves of another ("estate inc of").
        loop {
            let next: Vec<String> = self
                .drop_stoplist(&kept)
                .into_iter()
                .map(str::to_string)
                .collect();
            if next.len() == kept.len() {
                break;
            }
            kept = next;
        }
        if kept.is_empty() {
            tokens.join(" ")
        } else {
            kept.join(" ")
        }
    }

    /// Significant tokens of an already normalized string: long enough and
    /// not generic.
    pub fn significant_tokens(&self, normalized: &str) -> Vec<String> {
        tokenize(normalized, self.min_token_len)
            .into_iter()
            .filter(|token| !is_generic_token(token))
            .collect()
    }

    fn drop_stoplist<'a>(&self, tokens: &'a [String]) -> Vec<&'a str> {
        let mut kept = Vec::with_capacity(tokens.len());
        let mut idx = 0;
        while idx < tokens.len() {
            let skip = self
                .stoplist
                .iter()
                .find(|phrase| tokens[idx..].starts_with(phrase.as_slice()))
                .map(Vec::len);
            match skip {
                Some(len) => idx += len,
                None => {
                    kept.push(tokens[idx].as_str());
                    idx += 1;
                }
            }
        }
        kept
    }
}

/// Returns true for tokens listed in [`GENERIC_TOKENS`].
pub fn is_generic_token(token: &str) -> bool {
    GENERIC_TOKENS.contains(&token)
}

fn clean(raw: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(raw.len());
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            cleaned.push(ch);
        } else if matches!(ch, '\'' | '\u{2019}' | '\u{2018}' | '`' | '.') {
            continue;
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().map(str::to_string).collect()
}
