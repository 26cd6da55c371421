use std::collections::BTreeSet;

use caselink_model::{CaseId, KeySet};

use super::{MatchStrategy, label_tokens};
use crate::index::CaseIndex;

/// The record's most distinctive label token names a single case.
///
/// The most distinctive token is the one with the fewest (but at least
/// one) cases; ties prefer the longer token, then the lexicographically
/// smaller one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueTokenMatch;

impl MatchStrategy for UniqueTokenMatch {
    fn name(&self) -> &'static str {
        "unique_token"
    }

    fn candidates(&self, keys: &KeySet, index: &CaseIndex) -> BTreeSet<CaseId> {
        label_tokens(keys, index)
            .iter()
            .filter_map(|token| {
                let cases = index.by_token(token).filter(|cases| !cases.is_empty())?;
                Some((token, cases))
            })
            .min_by(|(a_token, a_cases), (b_token, b_cases)| {
                a_cases
                    .len()
                    .cmp(&b_cases.len())
                    .then_with(|| b_token.len().cmp(&a_token.len()))
                    .then_with(|| a_token.cmp(b_token))
            })
            .map(|(_, cases)| cases.clone())
            .unwrap_or_default()
    }
}
