//! E-mail address normalization.

/// Normalizes an e-mail address or header value.
///
/// Accepts bare addresses, `mailto:` links and `Display Name <addr>`
/// forms. Returns `None` unless the result has exactly one `@`, a
/// non-empty local part and a dotted domain.
pub fn normalize_email(raw: &str) -> Option<String> {
    let mut value = raw.trim();
    if let Some(start) = value.rfind('<') {
        let inner = &value[start + 1..];
        value = inner.split('>').next().unwrap_or(inner);
    }
    let value = value.trim().trim_matches('"');
    let value = strip_prefix_ignore_case(value, "mailto:").unwrap_or(value);
    let email = value.trim().to_lowercase();

    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return None;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return None;
    }
    Some(email)
}

/// Domain part of a normalized address.
pub fn email_domain(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}

/// True when `email` belongs to `domain` or one of its sub-domains.
pub fn is_in_domain(email: &str, domain: &str) -> bool {
    let domain = domain.trim().trim_start_matches('@').to_lowercase();
    if domain.is_empty() {
        return false;
    }
    match email_domain(email) {
        Some(actual) => actual == domain || actual.ends_with(&format!(".{domain}")),
        None => false,
    }
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        value.get(prefix.len()..)
    } else {
        None
    }
}
