//! Case registry index.
//!
//! The index is built once per run from the full case list and is
//! read-only afterwards. Every lookup table fails closed: when two
//! distinct cases produce the same key the key is marked ambiguous and
//! keeps both ids, so single-hit strategies can never pick one of them.

use std::collections::{BTreeMap, BTreeSet};

use caselink_model::{Case, CaseId};
use caselink_normalization::{NameNormalizer, normalize_code, normalize_email, normalize_phone};
use serde::Serialize;
use tracing::{debug, info_span};

use crate::error::{IndexError, Result};

/// What a key maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Unique(CaseId),
    /// Two or more distinct cases share the key.
    Ambiguous(BTreeSet<CaseId>),
}

impl Slot {
    /// Every case id held by the slot.
    pub fn case_ids(&self) -> Vec<&CaseId> {
        match self {
            Self::Unique(id) => vec![id],
            Self::Ambiguous(ids) => ids.iter().collect(),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }
}

/// Exact-value lookup table with collision tracking.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    slots: BTreeMap<String, Slot>,
}

impl KeyIndex {
    /// Registers `key` for `case_id`. Blank keys are ignored; registering
    /// the same case twice under one key is not a collision.
    pub fn insert(&mut self, key: impl Into<String>, case_id: &CaseId) {
        let key = key.into();
        if key.is_empty() {
            return;
        }
        let next = match self.slots.get(&key) {
            None => Slot::Unique(case_id.clone()),
            Some(Slot::Unique(existing)) if existing == case_id => return,
            Some(Slot::Unique(existing)) => {
                Slot::Ambiguous(BTreeSet::from([existing.clone(), case_id.clone()]))
            }
            Some(Slot::Ambiguous(ids)) => {
                let mut ids = ids.clone();
                ids.insert(case_id.clone());
                Slot::Ambiguous(ids)
            }
        };
        self.slots.insert(key, next);
    }

    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }

    /// The case a key maps to, if exactly one.
    pub fn unique(&self, key: &str) -> Option<&CaseId> {
        match self.slots.get(key)? {
            Slot::Unique(id) => Some(id),
            Slot::Ambiguous(_) => None,
        }
    }

    /// Adds every case the key maps to into `out`.
    pub fn collect_into(&self, key: &str, out: &mut BTreeSet<CaseId>) {
        if let Some(slot) = self.slots.get(key) {
            out.extend(slot.case_ids().into_iter().cloned());
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn ambiguous(&self) -> impl Iterator<Item = (&str, &BTreeSet<CaseId>)> {
        self.slots.iter().filter_map(|(key, slot)| match slot {
            Slot::Ambiguous(ids) => Some((key.as_str(), ids)),
            Slot::Unique(_) => None,
        })
    }
}

/// A case name prepared for token and substring comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCase {
    pub case_id: CaseId,
    /// Normalized display name in natural order.
    pub name: String,
    /// Significant tokens of `name`.
    pub tokens: BTreeSet<String>,
}

/// Key and collision counts of one lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStat {
    pub index: &'static str,
    pub keys: usize,
    pub ambiguous: usize,
}

/// A key shared by several cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousKey {
    pub index: &'static str,
    pub key: String,
    pub case_ids: Vec<CaseId>,
}

/// Immutable lookup structure over the case registry.
#[derive(Debug, Clone, Default)]
pub struct CaseIndex {
    cases: BTreeMap<CaseId, Case>,
    by_exact_name: KeyIndex,
    by_token: BTreeMap<String, BTreeSet<CaseId>>,
    by_phone: KeyIndex,
    by_email: KeyIndex,
    by_ref: KeyIndex,
    by_claim_number: KeyIndex,
    names: Vec<NamedCase>,
    normalizer: NameNormalizer,
}

impl CaseIndex {
    /// Builds every lookup table from the registry.
    ///
    /// The result does not depend on the order of `cases`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateCaseId`] if two cases share an id.
    pub fn build(cases: &[Case], normalizer: &NameNormalizer) -> Result<Self> {
        let span = info_span!("build_index", case_count = cases.len());
        let _guard = span.enter();

        let mut by_id = BTreeMap::new();
        for case in cases {
            if by_id.insert(case.id.clone(), case.clone()).is_some() {
                return Err(IndexError::DuplicateCaseId(case.id.clone()));
            }
        }

        let mut index = Self {
            normalizer: normalizer.clone(),
            ..Self::default()
        };
        for case in by_id.values() {
            index.add_case(case, normalizer);
        }
        index.cases = by_id;

        for stat in index.stats() {
            debug!(
                index = stat.index,
                keys = stat.keys,
                ambiguous = stat.ambiguous,
                "index built"
            );
        }
        Ok(index)
    }

    fn add_case(&mut self, case: &Case, normalizer: &NameNormalizer) {
        let id = &case.id;
        let name = normalizer.normalize(&case.display_name);
        for ordering in name_orderings(&case.display_name, &name, normalizer) {
            self.by_exact_name.insert(ordering, id);
        }

        let tokens: BTreeSet<String> = normalizer.significant_tokens(&name).into_iter().collect();
        for token in &tokens {
            self.by_token
                .entry(token.clone())
                .or_default()
                .insert(id.clone());
        }
        if !name.is_empty() {
            self.names.push(NamedCase {
                case_id: id.clone(),
                name,
                tokens,
            });
        }

        if let Some(phone) = case.primary_phone.as_deref().and_then(normalize_phone) {
            self.by_phone.insert(phone, id);
        }
        if let Some(email) = case.primary_email.as_deref().and_then(normalize_email) {
            self.by_email.insert(email, id);
        }
        if let Some(code) = case.reference_code.as_deref().and_then(normalize_code) {
            self.by_ref.insert(code, id);
        }
        if let Some(claim) = case.claim_number.as_deref().and_then(normalize_code) {
            self.by_claim_number.insert(claim, id);
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// The normalizer the index was built with. Record labels must be
    /// tokenized with the same settings.
    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn case(&self, id: &CaseId) -> Option<&Case> {
        self.cases.get(id)
    }

    pub fn by_exact_name(&self) -> &KeyIndex {
        &self.by_exact_name
    }

    /// Cases whose significant tokens include `token`.
    pub fn by_token(&self, token: &str) -> Option<&BTreeSet<CaseId>> {
        self.by_token.get(token)
    }

    pub fn by_phone(&self) -> &KeyIndex {
        &self.by_phone
    }

    pub fn by_email(&self) -> &KeyIndex {
        &self.by_email
    }

    pub fn by_ref(&self) -> &KeyIndex {
        &self.by_ref
    }

    pub fn by_claim_number(&self) -> &KeyIndex {
        &self.by_claim_number
    }

    /// Named cases in case-id order.
    pub fn names(&self) -> &[NamedCase] {
        &self.names
    }

    fn key_indexes(&self) -> [(&'static str, &KeyIndex); 5] {
        [
            ("exact_name", &self.by_exact_name),
            ("phone", &self.by_phone),
            ("email", &self.by_email),
            ("reference_code", &self.by_ref),
            ("claim_number", &self.by_claim_number),
        ]
    }

    /// Key and collision counts per table. For the token table,
    /// `ambiguous` counts tokens shared by more than one case.
    pub fn stats(&self) -> Vec<IndexStat> {
        let mut stats: Vec<IndexStat> = self
            .key_indexes()
            .into_iter()
            .map(|(index, keys)| IndexStat {
                index,
                keys: keys.len(),
                ambiguous: keys.ambiguous().count(),
            })
            .collect();
        stats.insert(
            1,
            IndexStat {
                index: "token",
                keys: self.by_token.len(),
                ambiguous: self.by_token.values().filter(|ids| ids.len() > 1).count(),
            },
        );
        stats
    }

    /// Colliding keys of the exact-value tables, sorted by table then key.
    pub fn ambiguous_keys(&self) -> Vec<AmbiguousKey> {
        self.key_indexes()
            .into_iter()
            .flat_map(|(index, keys)| {
                keys.ambiguous().map(move |(key, ids)| AmbiguousKey {
                    index,
                    key: key.to_string(),
                    case_ids: ids.iter().cloned().collect(),
                })
            })
            .collect()
    }
}

/// Exact-name keys of a case: the natural order plus the swapped order.
///
/// `Last, First` names are also registered as `first last`; names without
/// a comma are also registered with their last token moved to the front,
/// which covers both orders of two-token names.
fn name_orderings(raw: &str, natural: &str, normalizer: &NameNormalizer) -> Vec<String> {
    let mut orderings = vec![natural.to_string()];
    let swapped = match raw.split_once(',') {
        Some((last, first)) => normalizer.normalize(&format!("{first} {last}")),
        None => {
            let tokens: Vec<&str> = natural.split_whitespace().collect();
            match tokens.split_last() {
                Some((last, rest)) if !rest.is_empty() => {
                    let mut swapped = vec![*last];
                    swapped.extend_from_slice(rest);
                    swapped.join(" ")
                }
                _ => String::new(),
            }
        }
    };
    if !swapped.is_empty() && swapped != natural {
        orderings.push(swapped);
    }
    orderings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(id: &str, name: &str) -> Case {
        Case::new(CaseId::new(id).unwrap(), name)
    }

    fn id(value: &str) -> CaseId {
        CaseId::new(value).unwrap()
    }

    fn build(cases: &[Case]) -> CaseIndex {
        CaseIndex::build(cases, &NameNormalizer::default()).unwrap()
    }

    #[test]
    fn registers_both_name_orderings() {
        let index = build(&[case("c1", "Smith, John"), case("c2", "Mary Ann Jones")]);
        let names = index.by_exact_name();
        assert_eq!(names.unique("smith john"), Some(&id("c1")));
        assert_eq!(names.unique("john smith"), Some(&id("c1")));
        assert_eq!(names.unique("mary ann jones"), Some(&id("c2")));
        assert_eq!(names.unique("jones mary ann"), Some(&id("c2")));
    }

    #[test]
    fn comma_before_corporate_suffix_is_not_a_name_swap() {
        let index = build(&[case("c1", "Laurel Rd Holdings, LLC")]);
        let names = index.by_exact_name();
        assert_eq!(names.unique("laurel rd holdings"), Some(&id("c1")));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn collisions_are_marked_ambiguous() {
        let index = build(&[
            case("c1", "John Smith").with_phone("502-555-1234"),
            case("c2", "Smith, John").with_phone("(502) 555-1234"),
        ]);
        assert!(index.by_exact_name().get("john smith").unwrap().is_ambiguous());
        assert_eq!(index.by_phone().unique("+15025551234"), None);

        let ambiguous = index.ambiguous_keys();
        assert_eq!(ambiguous.len(), 3);
        assert_eq!(ambiguous[2].index, "phone");
        assert_eq!(ambiguous[2].case_ids, vec![id("c1"), id("c2")]);
    }

    #[test]
    fn rejects_duplicate_case_ids() {
        let err = CaseIndex::build(
            &[case("c1", "A"), case("c1", "B")],
            &NameNormalizer::default(),
        )
        .unwrap_err();
        assert_eq!(err, IndexError::DuplicateCaseId(id("c1")));
    }

    #[test]
    fn token_index_keeps_every_case() {
        let index = build(&[case("c1", "Johnson, Mary"), case("c2", "Johnson, Robert")]);
        assert_eq!(index.by_token("johnson").map(BTreeSet::len), Some(2));
        assert_eq!(index.by_token("mary").map(BTreeSet::len), Some(1));

        let token_stat = &index.stats()[1];
        assert_eq!(token_stat.index, "token");
        assert_eq!(token_stat.keys, 3);
        assert_eq!(token_stat.ambiguous, 1);
    }

    #[test]
    fn codes_are_indexed_normalized() {
        let index = build(&[case("c1", "Acme")
            .with_reference_code("lit-2023-0042")
            .with_claim_number("CLM 88-1234")]);
        assert_eq!(index.by_ref().unique("LIT20230042"), Some(&id("c1")));
        assert_eq!(index.by_claim_number().unique("CLM881234"), Some(&id("c1")));
    }
}
