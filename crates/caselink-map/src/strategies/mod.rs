//! Match strategies.
//!
//! Each strategy maps a record's key set to the set of cases it considers
//! plausible. The resolver accepts a strategy's answer only when that set
//! holds exactly one case; any other size falls through to the next
//! strategy.

use std::collections::BTreeSet;

use caselink_model::{CaseId, KeySet};

use crate::index::CaseIndex;

mod code;
mod exact_name;
mod identity;
mod substring;
mod token_subset;
mod unique_token;

pub use code::CodeMatch;
pub use exact_name::ExactNameMatch;
pub use identity::IdentityMatch;
pub use substring::{DEFAULT_SUBSTRING_MIN_LEN, SubstringMatch};
pub use token_subset::{DEFAULT_SUBSET_MARGIN, TokenSubsetMatch};
pub use unique_token::UniqueTokenMatch;

/// One deterministic rule of the resolver chain.
pub trait MatchStrategy: Send + Sync {
    /// Name recorded on decisions won by this strategy.
    fn name(&self) -> &'static str;

    /// Cases this strategy considers a match for `keys`.
    ///
    /// Must be deterministic and must not depend on any state outside
    /// `keys` and `index`.
    fn candidates(&self, keys: &KeySet, index: &CaseIndex) -> BTreeSet<CaseId>;
}

/// Significant tokens of every label in `keys`, without duplicates.
pub(crate) fn label_tokens(keys: &KeySet, index: &CaseIndex) -> BTreeSet<String> {
    keys.names
        .iter()
        .flat_map(|label| index.normalizer().significant_tokens(label))
        .collect()
}
