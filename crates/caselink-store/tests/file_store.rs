//! Writer behavior against a real data directory.

use std::fs;

use caselink_model::{CaseId, LinkOrigin, LinkageDecision, MatchCandidate, NaturalKey, SourceKind};
use caselink_store::{
    CaseRegistry, FileStore, LinkageStore, LinkageWriter, RecordScope, RecordSource, WriteMode,
    WriterOptions, apply_scope, set_manual_link,
};
use chrono::Utc;
use tempfile::tempdir;

fn decision(call_id: &str, case: &str) -> LinkageDecision {
    LinkageDecision::matched(
        NaturalKey::new(SourceKind::Call, call_id).unwrap(),
        MatchCandidate {
            case_id: CaseId::new(case).unwrap(),
            strategy: "identity",
        },
        None,
    )
}

#[test]
fn commit_is_idempotent_on_disk() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    let writer = LinkageWriter::new(WriterOptions {
        batch_size: 2,
        ..WriterOptions::default()
    });
    let decisions: Vec<LinkageDecision> = (0..5)
        .map(|i| decision(&format!("call-{i}"), "case-1"))
        .collect();

    let first = writer
        .write(&decisions, WriteMode::Commit, &mut store, Utc::now())
        .unwrap();
    assert_eq!(first.written, 5);
    let after_first = fs::read_to_string(store.linkages_path()).unwrap();

    let second = writer
        .write(&decisions, WriteMode::Commit, &mut store, Utc::now())
        .unwrap();
    assert_eq!(second.written, 0);
    assert_eq!(second.unchanged, 5);
    assert_eq!(fs::read_to_string(store.linkages_path()).unwrap(), after_first);
}

#[test]
fn manual_link_survives_re_resolution() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    let key = NaturalKey::new(SourceKind::Call, "call-1").unwrap();
    set_manual_link(&mut store, key.clone(), CaseId::new("case-9").unwrap(), Utc::now()).unwrap();

    let summary = LinkageWriter::default()
        .write(&[decision("call-1", "case-1")], WriteMode::Commit, &mut store, Utc::now())
        .unwrap();
    assert_eq!(summary.protected, 1);

    let linkages = store.linkages().unwrap();
    assert_eq!(linkages[&key].case_id.as_str(), "case-9");
    assert_eq!(linkages[&key].origin, LinkOrigin::Manual);
}

#[test]
fn reads_registry_and_scoped_sources() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("cases.csv"),
        "id,display_name,primary_phone\ncase-1,\"Smith, John\",502-555-1234\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("calls.jsonl"),
        "{\"call_id\":\"call-1\"}\n{\"call_id\":\"call-2\"}\n{broken\n",
    )
    .unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.load_cases().unwrap().len(), 1);

    LinkageWriter::default()
        .write(&[decision("call-1", "case-1")], WriteMode::Commit, &mut store, Utc::now())
        .unwrap();

    let batch = store.load_records(SourceKind::Call).unwrap();
    assert_eq!(batch.records.len(), 2);
    assert_eq!(batch.rejected.len(), 1);

    let linkages = store.linkages().unwrap();
    let unlinked = apply_scope(batch, &linkages, RecordScope::Unlinked);
    assert_eq!(unlinked.records.len(), 1);
    assert!(store.load_records(SourceKind::Email).unwrap().records.is_empty());
}
