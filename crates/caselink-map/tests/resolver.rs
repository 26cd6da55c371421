//! Resolver behavior against a small registry.

use caselink_map::{CaseIndex, Resolver, ResolverOptions, StrategyKind};
use caselink_model::{Case, CaseId, KeySet, NaturalKey, SourceKind};
use caselink_normalization::{NameNormalizer, normalize_folder_label, normalize_phone};
use proptest::prelude::*;

fn id(value: &str) -> CaseId {
    CaseId::new(value).unwrap()
}

fn registry() -> Vec<Case> {
    vec![
        Case::new(id("c-100"), "Smith, John").with_phone("+15025551234"),
        Case::new(id("c-200"), "Johnson, Mary"),
        Case::new(id("c-201"), "Johnson, Robert"),
        Case::new(id("c-300"), "Laurel Rd Holdings").with_reference_code("LIT-2023-0042"),
        Case::new(id("c-400"), "Brightwater Marine Services")
            .with_email("ops@brightwater.example")
            .with_claim_number("CLM-77812"),
    ]
}

fn index() -> CaseIndex {
    CaseIndex::build(&registry(), &NameNormalizer::default()).unwrap()
}

#[test]
fn phone_identity_wins_first() {
    let mut keys = KeySet::new();
    keys.add_phone(normalize_phone("(502) 555-1234").unwrap());
    keys.add_name("unrelated caller");

    let resolution = Resolver::default().resolve(&keys, &index());
    let candidate = resolution.candidate.unwrap();
    assert_eq!(candidate.case_id, id("c-100"));
    assert_eq!(candidate.strategy, "identity");
}

#[test]
fn shared_surname_is_unmatched() {
    let mut keys = KeySet::new();
    keys.add_name(normalize_folder_label("Johnson"));

    let resolution = Resolver::default().resolve(&keys, &index());
    assert!(resolution.candidate.is_none());
    assert_eq!(resolution.trace.len(), 6);
    assert!(resolution.trace.iter().all(|attempt| attempt.candidates != 1));
}

#[test]
fn numbered_folder_resolves_by_exact_name() {
    let mut keys = KeySet::new();
    keys.add_name(normalize_folder_label("453 Laurel Rd Holdings LLC"));

    let candidate = Resolver::default()
        .resolve(&keys, &index())
        .candidate
        .unwrap();
    assert_eq!(candidate.case_id, id("c-300"));
    assert_eq!(candidate.strategy, "exact_name");
}

#[test]
fn reference_code_beats_unknown_sender() {
    let mut keys = KeySet::new();
    keys.add_email("stranger@example.org");
    keys.add_ref_code("LIT20230042");
    keys.add_name("please review");

    let candidate = Resolver::default()
        .resolve(&keys, &index())
        .candidate
        .unwrap();
    assert_eq!(candidate.case_id, id("c-300"));
    assert_eq!(candidate.strategy, "code");
}

#[test]
fn conflicting_identity_keys_fall_through() {
    let mut keys = KeySet::new();
    keys.add_phone("+15025551234");
    keys.add_email("ops@brightwater.example");
    keys.add_claim_number("CLM77812");

    let candidate = Resolver::default()
        .resolve(&keys, &index())
        .candidate
        .unwrap();
    assert_eq!(candidate.case_id, id("c-400"));
    assert_eq!(candidate.strategy, "code");
}

#[test]
fn disabled_strategies_are_skipped() {
    let options = ResolverOptions {
        strategies: vec![StrategyKind::Identity],
        ..ResolverOptions::default()
    };
    let mut keys = KeySet::new();
    keys.add_name("smith john");

    let resolution = Resolver::from_options(&options).resolve(&keys, &index());
    assert!(resolution.candidate.is_none());
    assert_eq!(resolution.trace.len(), 1);
}

#[test]
fn unmatched_decision_keeps_label() {
    let mut keys = KeySet::new();
    keys.add_name("johnson");
    let key = NaturalKey::new(SourceKind::Document, "Johnson/a.pdf").unwrap();

    let decision = Resolver::default().decide(key, &keys, &index());
    assert!(!decision.is_matched());
    assert_eq!(decision.label.as_deref(), Some("johnson"));
    assert_eq!(decision.strategy, None);
}

#[test]
fn resolver_options_parse_from_toml() {
    let options: ResolverOptions =
        toml::from_str("strategies = [\"code\", \"exact_name\"]\nsubstring_min_len = 8").unwrap();
    assert_eq!(
        options.strategies,
        vec![StrategyKind::Code, StrategyKind::ExactName]
    );
    assert_eq!(options.substring_min_len, 8);
    assert_eq!(options.subset_margin, 1);

    assert!(toml::from_str::<ResolverOptions>("strategies = [\"fuzzy\"]").is_err());
}

#[test]
fn index_statistics_serialize() {
    let stats = serde_json::to_value(index().stats()).unwrap();
    assert_eq!(stats[0]["index"], "exact_name");
    assert_eq!(stats[1]["index"], "token");
    assert_eq!(stats[1]["ambiguous"], 1);
}

fn label_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "smith john",
        "john smith",
        "johnson",
        "johnson mary",
        "laurel rd holdings",
        "brightwater marine",
        "marine",
        "unknown party",
    ])
    .prop_map(str::to_string)
}

proptest! {
    #[test]
    fn registry_order_does_not_change_decisions(
        shuffled in Just(registry()).prop_shuffle(),
        labels in prop::collection::vec(label_strategy(), 1..4),
    ) {
        let normalizer = NameNormalizer::default();
        let sorted = CaseIndex::build(&registry(), &normalizer).unwrap();
        let permuted = CaseIndex::build(&shuffled, &normalizer).unwrap();
        prop_assert_eq!(sorted.ambiguous_keys(), permuted.ambiguous_keys());

        let mut keys = KeySet::new();
        for label in labels {
            keys.add_name(label);
        }
        let resolver = Resolver::default();
        prop_assert_eq!(resolver.resolve(&keys, &sorted), resolver.resolve(&keys, &permuted));
    }

    #[test]
    fn matches_are_single_winners(labels in prop::collection::vec(label_strategy(), 1..4)) {
        let index = index();
        let mut keys = KeySet::new();
        for label in labels {
            keys.add_name(label);
        }
        let resolution = Resolver::default().resolve(&keys, &index);
        if let Some(candidate) = resolution.candidate {
            let winner = resolution.trace.last().unwrap();
            prop_assert_eq!(winner.strategy, candidate.strategy);
            prop_assert_eq!(winner.candidates, 1);
        }
    }
}
