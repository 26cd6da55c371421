//! Folder label normalization.
//!
//! Case folders are often named `<numeric id> <case name>` and collect
//! duplicates such as `Smith, John - Copy` or `Smith, John (2)`. Both
//! decorations are removed before the label is normalized as a name.

use crate::name::NameNormalizer;

/// Characters that may appear inside a leading numeric identifier.
const ID_CHARS: &[char] = &['-', '_', '.', '#'];

/// Normalizes a folder label with the default name normalizer.
pub fn normalize_folder_label(raw: &str) -> String {
    NameNormalizer::default().normalize_folder_label(raw)
}

impl NameNormalizer {
    /// Strips a leading numeric identifier and trailing copy markers, then
    /// normalizes the remainder as a name.
    ///
    /// If stripping would leave nothing, the whole label is normalized.
    pub fn normalize_folder_label(&self, raw: &str) -> String {
        let stripped = strip_copy_markers(strip_leading_id(raw.trim()));
        let normalized = self.normalize(stripped);
        if normalized.is_empty() {
            self.normalize(raw)
        } else {
            normalized
        }
    }
}

fn strip_leading_id(label: &str) -> &str {
    let end = label
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_digit() || ID_CHARS.contains(ch)))
        .map_or(label.len(), |(idx, _)| idx);
    let prefix = &label[..end];
    if end == label.len() || !prefix.chars().any(|ch| ch.is_ascii_digit()) {
        return label;
    }
    let rest = &label[end..];
    let separated = prefix.ends_with(ID_CHARS)
        || rest.starts_with(char::is_whitespace);
    if separated {
        rest.trim_start_matches(|ch: char| ch.is_whitespace() || ID_CHARS.contains(&ch))
    } else {
        label
    }
}

fn strip_copy_markers(label: &str) -> &str {
    let mut current = label.trim();
    loop {
        let before = current;
        current = strip_copy_of_prefix(current);
        current = strip_numbered_suffix(current);
        current = strip_copy_suffix(current);
        current = current.trim_end_matches(|ch: char| ch.is_whitespace() || ch == '-' || ch == '_');
        if current == before {
            return current;
        }
    }
}

fn strip_copy_of_prefix(label: &str) -> &str {
    const PREFIX: &str = "copy of ";
    match label.get(..PREFIX.len()) {
        Some(head) if head.eq_ignore_ascii_case(PREFIX) => label[PREFIX.len()..].trim_start(),
        _ => label,
    }
}

fn strip_numbered_suffix(label: &str) -> &str {
    let Some(body) = label.strip_suffix(')') else {
        return label;
    };
    let Some(open) = body.rfind('(') else {
        return label;
    };
    let inner = body[open + 1..].trim();
    if !inner.is_empty() && inner.chars().all(|ch| ch.is_ascii_digit()) {
        label[..open].trim_end()
    } else {
        label
    }
}

fn strip_copy_suffix(label: &str) -> &str {
    const SUFFIX: &str = "copy";
    if label.len() <= SUFFIX.len() {
        return label;
    }
    let split = label.len() - SUFFIX.len();
    let (Some(head), Some(tail)) = (label.get(..split), label.get(split..)) else {
        return label;
    };
    let boundary = head.ends_with(|ch: char| ch.is_whitespace() || ch == '-' || ch == '_');
    if boundary && tail.eq_ignore_ascii_case(SUFFIX) {
        head
    } else {
        label
    }
}
