//! Phone number normalization (North American numbering plan).

/// Country code prefixed to 10-digit national numbers.
pub const COUNTRY_CODE: &str = "1";

/// Trunk prefix accepted on 11-digit numbers.
const TRUNK_PREFIX: char = '1';

const NATIONAL_DIGITS: usize = 10;

/// Minimum digits seen before trailing letters are treated as an extension.
const EXTENSION_MIN_DIGITS: usize = 7;

/// Normalizes a phone number to `+1NXXNXXXXXX` form.
///
/// Formatting characters are ignored and a trailing extension (`x12`,
/// `ext. 12`) is dropped. Ten digits get the country code prefixed; eleven
/// digits starting with the trunk prefix are kept. Anything else yields
/// `None`. Never panics.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let mut digits = String::with_capacity(NATIONAL_DIGITS + 1);
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_alphabetic() && digits.len() >= EXTENSION_MIN_DIGITS {
            break;
        }
    }
    match digits.len() {
        NATIONAL_DIGITS => Some(format!("+{COUNTRY_CODE}{digits}")),
        11 if digits.starts_with(TRUNK_PREFIX) => Some(format!("+{digits}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ten_and_eleven_digit_numbers() {
        assert_eq!(
            normalize_phone("(502) 555-1234").as_deref(),
            Some("+15025551234")
        );
        assert_eq!(
            normalize_phone("1-502-555-1234").as_deref(),
            Some("+15025551234")
        );
        assert_eq!(
            normalize_phone("+1 502.555.1234").as_deref(),
            Some("+15025551234")
        );
    }

    #[test]
    fn drops_extensions() {
        assert_eq!(
            normalize_phone("502-555-1234 ext. 22").as_deref(),
            Some("+15025551234")
        );
        assert_eq!(
            normalize_phone("502-555-1234x9").as_deref(),
            Some("+15025551234")
        );
    }

    #[test]
    fn rejects_other_lengths() {
        assert_eq!(normalize_phone(""), None);
        assert_eq!(normalize_phone("555-1234"), None);
        assert_eq!(normalize_phone("25025551234"), None);
        assert_eq!(normalize_phone("+44 20 7946 0958 11"), None);
        assert_eq!(normalize_phone("anonymous"), None);
    }
}
