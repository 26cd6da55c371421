use std::collections::BTreeSet;

use caselink_model::{CaseId, KeySet};

use super::MatchStrategy;
use crate::index::CaseIndex;

/// A record label equal to a case name in either ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactNameMatch;

impl MatchStrategy for ExactNameMatch {
    fn name(&self) -> &'static str {
        "exact_name"
    }

    fn candidates(&self, keys: &KeySet, index: &CaseIndex) -> BTreeSet<CaseId> {
        let mut found = BTreeSet::new();
        for label in &keys.names {
            index.by_exact_name().collect_into(label, &mut found);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use caselink_model::Case;
    use caselink_normalization::NameNormalizer;

    use super::*;

    fn id(value: &str) -> CaseId {
        CaseId::new(value).unwrap()
    }

    fn index(names: &[(&str, &str)]) -> CaseIndex {
        let cases: Vec<Case> = names
            .iter()
            .map(|(case_id, name)| Case::new(id(case_id), *name))
            .collect();
        CaseIndex::build(&cases, &NameNormalizer::default()).unwrap()
    }

    fn label(value: &str) -> KeySet {
        let mut keys = KeySet::new();
        keys.add_name(value);
        keys
    }

    #[test]
    fn partial_name_yields_nothing() {
        let index = index(&[("c1", "Smith, John")]);
        assert!(ExactNameMatch.candidates(&label("smith"), &index).is_empty());
    }

    #[test]
    fn either_ordering_finds_the_case() {
        let index = index(&[("c1", "Smith, John"), ("c2", "Garcia, Ana")]);
        for value in ["john smith", "smith john"] {
            assert_eq!(
                ExactNameMatch.candidates(&label(value), &index),
                BTreeSet::from([id("c1")]),
                "{value}"
            );
        }
    }

    #[test]
    fn shared_name_reports_every_case() {
        let index = index(&[("c1", "John Smith"), ("c2", "Smith, John")]);
        assert_eq!(
            ExactNameMatch.candidates(&label("john smith"), &index),
            BTreeSet::from([id("c1"), id("c2")])
        );
    }
}
