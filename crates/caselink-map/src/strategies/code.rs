use std::collections::BTreeSet;

use caselink_model::{CaseId, KeySet};

use super::MatchStrategy;
use crate::index::CaseIndex;

/// Case reference code or claim number found in the record's text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeMatch;

impl MatchStrategy for CodeMatch {
    fn name(&self) -> &'static str {
        "code"
    }

    fn candidates(&self, keys: &KeySet, index: &CaseIndex) -> BTreeSet<CaseId> {
        let mut found = BTreeSet::new();
        for code in &keys.ref_codes {
            index.by_ref().collect_into(code, &mut found);
        }
        for claim in &keys.claim_numbers {
            index.by_claim_number().collect_into(claim, &mut found);
        }
        found
    }
}
