use std::collections::{BTreeMap, BTreeSet};

use caselink_model::{CaseId, KeySet};

use super::MatchStrategy;
use crate::index::CaseIndex;

pub const DEFAULT_SUBSET_MARGIN: usize = 1;

/// Case names of at least this many significant tokens take part.
const MIN_CASE_TOKENS: usize = 2;

/// Every significant token of a case name appears in one record label.
///
/// When several cases qualify, the one with the most tokens wins if it
/// leads every other candidate by at least `margin` tokens.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubsetMatch {
    margin: usize,
}

impl Default for TokenSubsetMatch {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSET_MARGIN)
    }
}

impl TokenSubsetMatch {
    /// A zero margin is raised to one so that ties stay ambiguous.
    pub fn new(margin: usize) -> Self {
        Self {
            margin: margin.max(1),
        }
    }

    pub fn margin(&self) -> usize {
        self.margin
    }
}

impl MatchStrategy for TokenSubsetMatch {
    fn name(&self) -> &'static str {
        "token_subset"
    }

    fn candidates(&self, keys: &KeySet, index: &CaseIndex) -> BTreeSet<CaseId> {
        let labels: Vec<BTreeSet<String>> = keys
            .names
            .iter()
            .map(|label| index.normalizer().significant_tokens(label).into_iter().collect())
            .collect();

        let mut scores: BTreeMap<&CaseId, usize> = BTreeMap::new();
        for case in index.names() {
            if case.tokens.len() < MIN_CASE_TOKENS {
                continue;
            }
            if labels.iter().any(|tokens| case.tokens.is_subset(tokens)) {
                scores.insert(&case.case_id, case.tokens.len());
            }
        }

        let Some((&leader, &best)) = scores.iter().max_by_key(|(_, score)| **score) else {
            return BTreeSet::new();
        };
        let runner_up = scores
            .iter()
            .filter(|(id, _)| **id != leader)
            .map(|(_, score)| *score)
            .max();
        match runner_up {
            Some(second) if best < second + self.margin => {
                scores.into_keys().cloned().collect()
            }
            _ => BTreeSet::from([leader.clone()]),
        }
    }
}
