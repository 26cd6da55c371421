use std::collections::BTreeSet;

use caselink_model::{CaseId, KeySet};

use super::MatchStrategy;
use crate::index::CaseIndex;

pub const DEFAULT_SUBSTRING_MIN_LEN: usize = 6;

/// A case name contained in a record label, or the reverse.
///
/// Containment respects token boundaries, and the shorter of the two
/// strings must be at least `min_len` characters long.
#[derive(Debug, Clone, Copy)]
pub struct SubstringMatch {
    min_len: usize,
}

impl Default for SubstringMatch {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSTRING_MIN_LEN)
    }
}

impl SubstringMatch {
    pub fn new(min_len: usize) -> Self {
        Self {
            min_len: min_len.max(1),
        }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }
}

impl MatchStrategy for SubstringMatch {
    fn name(&self) -> &'static str {
        "substring"
    }

    fn candidates(&self, keys: &KeySet, index: &CaseIndex) -> BTreeSet<CaseId> {
        let mut found = BTreeSet::new();
        for label in &keys.names {
            let padded_label = format!(" {label} ");
            let label_len = label.chars().count();
            for case in index.names() {
                if label_len.min(case.name.chars().count()) < self.min_len {
                    continue;
                }
                let padded_name = format!(" {} ", case.name);
                if padded_label.contains(&padded_name) || padded_name.contains(&padded_label) {
                    found.insert(case.case_id.clone());
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use caselink_model::Case;
    use caselink_normalization::NameNormalizer;

    use super::*;

    fn index(names: &[(&str, &str)]) -> CaseIndex {
        let cases: Vec<Case> = names
            .iter()
            .map(|(id, name)| Case::new(CaseId::new(*id).unwrap(), *name))
            .collect();
        CaseIndex::build(&cases, &NameNormalizer::default()).unwrap()
    }

    fn label(value: &str) -> KeySet {
        let mut keys = KeySet::new();
        keys.add_name(value);
        keys
    }

    #[test]
    fn finds_name_inside_label_on_token_boundaries() {
        let index = index(&[("c1", "Acme Widgets"), ("c2", "Widgets")]);
        let found = SubstringMatch::default().candidates(&label("acme widgets deposition"), &index);
        assert_eq!(found.len(), 2);

        let found = SubstringMatch::default().candidates(&label("superacme widgets"), &index);
        assert_eq!(found, BTreeSet::from([CaseId::new("c2").unwrap()]));
    }

    #[test]
    fn finds_label_inside_name() {
        let index = index(&[("c1", "Brightwater Marine Services")]);
        let found = SubstringMatch::default().candidates(&label("brightwater marine"), &index);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn short_strings_never_match() {
        let index = index(&[("c1", "Lee")]);
        assert!(SubstringMatch::default().candidates(&label("lee family trust"), &index).is_empty());
    }
}
