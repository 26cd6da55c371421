//! Adapter behavior through the public dispatch API.

use caselink_ingest::{AdapterOptions, Adapters, InputError, SegmentMatcher, SourceAdapter};
use caselink_model::{CallRecord, DocumentRecord, EmailRecord, ExternalRecord, SourceKind};
use caselink_normalization::{CodeScanner, NameNormalizer};

fn document(path: &str) -> ExternalRecord {
    DocumentRecord {
        storage_path: path.to_string(),
        original_path: None,
        folder_label: None,
    }
    .into()
}

#[test]
fn dispatches_by_record_source() {
    let adapters = Adapters::default();
    for kind in SourceKind::ALL {
        assert_eq!(adapters.get(kind).source(), kind);
    }

    let call: ExternalRecord = CallRecord {
        call_id: "c-9".to_string(),
        external_phone: Some("502.555.1234 x12".to_string()),
        caller_name: None,
    }
    .into();
    let keys = adapters.extract(&call).unwrap();
    assert_eq!(keys.phones, vec!["+15025551234"]);
}

#[test]
fn wrong_adapter_reports_both_sources() {
    let adapters = Adapters::default();
    let err = adapters
        .get(SourceKind::Email)
        .extract(&document("Smith/a.pdf"))
        .unwrap_err();
    assert_eq!(
        err,
        InputError::WrongSource {
            expected: SourceKind::Email,
            found: SourceKind::Document,
        }
    );
}

#[test]
fn blank_storage_path_is_rejected() {
    let err = Adapters::default().extract(&document("  ")).unwrap_err();
    assert!(matches!(
        err,
        InputError::MissingKey {
            kind: SourceKind::Document,
            field: "storage_path",
        }
    ));
}

#[test]
fn document_folder_yields_label_and_codes() {
    let keys = Adapters::default()
        .extract(&document("Archive/LIT-2021-007 Johnson v. Acme/complaint.pdf"))
        .unwrap();
    assert_eq!(keys.ref_codes, vec!["LIT2021007"]);
    assert_eq!(keys.names, vec!["lit 2021 007 johnson v acme"]);
}

#[test]
fn email_without_subject_keeps_only_addresses() {
    let record: ExternalRecord = EmailRecord {
        message_id: "<x@mail>".to_string(),
        sender: Some("\"Jane Roe\" <JANE.ROE@Example.com>".to_string()),
        recipients: Vec::new(),
        subject: None,
    }
    .into();
    let keys = Adapters::default().extract(&record).unwrap();
    assert_eq!(keys.emails, vec!["jane.roe@example.com"]);
    assert!(keys.names.is_empty());
}

#[test]
fn adapter_options_parse_from_toml() {
    let options: AdapterOptions = toml::from_str(
        r#"
        [email]
        firm_domains = ["smithlaw.com"]

        [call]
        internal_numbers = ["502-555-0000"]

        [[document.rules]]
        name = "clients"
        segment = 1
        matcher = { kind = "named", names = ["Clients"] }

        [[document.rules]]
        name = "fallback"
        segment = 0
        matcher = { kind = "any" }
        "#,
    )
    .unwrap();
    assert_eq!(options.email.firm_domains, vec!["smithlaw.com"]);
    assert_eq!(options.document.rules.len(), 2);
    assert_eq!(options.document.rules[1].matcher, SegmentMatcher::Any);

    let adapters = Adapters::new(&options, &NameNormalizer::default(), &CodeScanner::default());
    let keys = adapters
        .extract(&document("Clients/Smith, John/notes.txt"))
        .unwrap();
    assert_eq!(keys.names, vec!["smith john"]);
}
