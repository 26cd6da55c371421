use std::collections::BTreeSet;

use caselink_model::{CaseId, KeySet};

use super::MatchStrategy;
use crate::index::CaseIndex;

/// Normalized phone number or e-mail address equal to a case's.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMatch;

impl MatchStrategy for IdentityMatch {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn candidates(&self, keys: &KeySet, index: &CaseIndex) -> BTreeSet<CaseId> {
        let mut found = BTreeSet::new();
        for phone in &keys.phones {
            index.by_phone().collect_into(phone, &mut found);
        }
        for email in &keys.emails {
            index.by_email().collect_into(email, &mut found);
        }
        found
    }
}
