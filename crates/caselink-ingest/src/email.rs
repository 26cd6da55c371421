//! E-mail adapter.

use caselink_model::{ExternalRecord, KeySet, SourceKind};
use caselink_normalization::{CodeScanner, NameNormalizer, is_in_domain, normalize_email};
use serde::{Deserialize, Serialize};

use crate::adapter::{SourceAdapter, require_key, wrong_source};
use crate::error::Result;

/// Reply and forward markers stripped from the start of a subject.
const SUBJECT_PREFIXES: &[&str] = &["re:", "fw:", "fwd:", "aw:", "[external]"];

/// Separators that split a subject into candidate labels.
const SUBJECT_SEPARATORS: &[&str] = &[" - ", " \u{2013} ", "|", ":", "/"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailOptions {
    /// Domains owned by the firm. Addresses in these domains, or their
    /// sub-domains, are never used as identity keys.
    pub firm_domains: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EmailAdapter {
    firm_domains: Vec<String>,
    names: NameNormalizer,
    codes: CodeScanner,
}

impl EmailAdapter {
    pub fn new(options: &EmailOptions, names: NameNormalizer, codes: CodeScanner) -> Self {
        let mut firm_domains: Vec<String> = options
            .firm_domains
            .iter()
            .map(|domain| domain.trim().trim_start_matches('@').to_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();
        firm_domains.sort();
        firm_domains.dedup();
        Self {
            firm_domains,
            names,
            codes,
        }
    }

    fn is_firm_address(&self, email: &str) -> bool {
        self.firm_domains
            .iter()
            .any(|domain| is_in_domain(email, domain))
    }
}

impl SourceAdapter for EmailAdapter {
    fn source(&self) -> SourceKind {
        SourceKind::Email
    }

    fn extract(&self, record: &ExternalRecord) -> Result<KeySet> {
        let ExternalRecord::Email(email) = record else {
            return Err(wrong_source(SourceKind::Email, record));
        };
        require_key(record, "message_id")?;

        let mut keys = KeySet::new();
        for participant in email.sender.iter().chain(email.recipients.iter()) {
            let Some(address) = normalize_email(participant) else {
                continue;
            };
            if self.is_firm_address(&address) {
                continue;
            }
            keys.add_email(address);
        }

        if let Some(subject) = email.subject.as_deref() {
            let subject = strip_subject_prefixes(subject);
            for code in self.codes.reference_codes(subject) {
                keys.add_ref_code(code);
            }
            for claim in self.codes.claim_numbers(subject) {
                keys.add_claim_number(claim);
            }
            keys.add_name(self.names.normalize(subject));
            for segment in subject_segments(subject) {
                keys.add_name(self.names.normalize(segment));
            }
        }
        Ok(keys)
    }
}

/// Removes leading reply/forward markers, repeatedly.
pub fn strip_subject_prefixes(subject: &str) -> &str {
    let mut current = subject.trim();
    loop {
        let stripped = SUBJECT_PREFIXES.iter().find_map(|prefix| {
            let head = current.get(..prefix.len())?;
            head.eq_ignore_ascii_case(prefix)
                .then(|| current[prefix.len()..].trim_start())
        });
        match stripped {
            Some(rest) => current = rest,
            None => return current,
        }
    }
}

fn subject_segments(subject: &str) -> Vec<&str> {
    let mut segments = vec![subject];
    for separator in SUBJECT_SEPARATORS {
        segments = segments
            .into_iter()
            .flat_map(|segment| segment.split(separator))
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();
    }
    if segments.len() < 2 {
        return Vec::new();
    }
    segments
}

#[cfg(test)]
mod tests {
    use caselink_model::EmailRecord;

    use super::*;

    fn adapter(firm_domains: &[&str]) -> EmailAdapter {
        let options = EmailOptions {
            firm_domains: firm_domains.iter().map(|d| (*d).to_string()).collect(),
        };
        EmailAdapter::new(&options, NameNormalizer::default(), CodeScanner::default())
    }

    fn record(sender: &str, recipients: &[&str], subject: &str) -> ExternalRecord {
        EmailRecord {
            message_id: "<m1@mail>".to_string(),
            sender: Some(sender.to_string()),
            recipients: recipients.iter().map(|r| (*r).to_string()).collect(),
            subject: Some(subject.to_string()),
        }
        .into()
    }

    #[test]
    fn excludes_firm_addresses() {
        let keys = adapter(&["smithlaw.com"])
            .extract(&record(
                "Paralegal <pl@smithlaw.com>",
                &["client@example.com", "scan@mail.smithlaw.com", "not an address"],
                "Hello",
            ))
            .unwrap();
        assert_eq!(keys.emails, vec!["client@example.com"]);
    }

    #[test]
    fn extracts_codes_and_labels_from_subject() {
        let keys = adapter(&[])
            .extract(&record(
                "a@example.com",
                &[],
                "RE: Fwd: Smith, John - LIT-2023-0042 records",
            ))
            .unwrap();
        assert_eq!(keys.ref_codes, vec!["LIT20230042"]);
        assert_eq!(
            keys.names,
            vec!["smith john lit 2023 0042 records", "smith john", "lit 2023 0042 records"]
        );
    }

    #[test]
    fn strips_nested_reply_prefixes() {
        assert_eq!(strip_subject_prefixes("RE: re:FW: Intake"), "Intake");
        assert_eq!(strip_subject_prefixes("Regarding Smith"), "Regarding Smith");
    }

    #[test]
    fn missing_message_id_is_an_input_error() {
        let record: ExternalRecord = EmailRecord::default().into();
        assert!(adapter(&[]).extract(&record).is_err());
    }
}
