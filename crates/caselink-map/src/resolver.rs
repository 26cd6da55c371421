//! Strategy chain resolver.

use std::fmt;
use std::str::FromStr;

use caselink_model::{KeySet, LinkageDecision, MatchCandidate, NaturalKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::index::CaseIndex;
use crate::strategies::{
    CodeMatch, DEFAULT_SUBSET_MARGIN, DEFAULT_SUBSTRING_MIN_LEN, ExactNameMatch, IdentityMatch,
    MatchStrategy, SubstringMatch, TokenSubsetMatch, UniqueTokenMatch,
};

/// Configurable strategy names, in default chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Identity,
    Code,
    ExactName,
    UniqueToken,
    TokenSubset,
    Substring,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        Self::Identity,
        Self::Code,
        Self::ExactName,
        Self::UniqueToken,
        Self::TokenSubset,
        Self::Substring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Code => "code",
            Self::ExactName => "exact_name",
            Self::UniqueToken => "unique_token",
            Self::TokenSubset => "token_subset",
            Self::Substring => "substring",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy '{s}'"))
    }
}

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Chain order. Strategies left out are disabled.
    pub strategies: Vec<StrategyKind>,
    pub substring_min_len: usize,
    pub subset_margin: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            strategies: StrategyKind::ALL.to_vec(),
            substring_min_len: DEFAULT_SUBSTRING_MIN_LEN,
            subset_margin: DEFAULT_SUBSET_MARGIN,
        }
    }
}

/// Candidate count of one strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyAttempt {
    pub strategy: &'static str,
    pub candidates: usize,
}

/// Outcome of resolving one key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub candidate: Option<MatchCandidate>,
    /// Strategies tried, in order, up to and including the winner.
    pub trace: Vec<StrategyAttempt>,
}

impl Resolution {
    pub fn is_matched(&self) -> bool {
        self.candidate.is_some()
    }

    /// Turns the outcome into a decision for `natural_key`, labelled with
    /// the key set's primary label.
    pub fn into_decision(self, natural_key: NaturalKey, keys: &KeySet) -> LinkageDecision {
        let label = keys.primary_label().map(str::to_string);
        match self.candidate {
            Some(candidate) => LinkageDecision::matched(natural_key, candidate, label),
            None => LinkageDecision::unmatched(natural_key, label),
        }
    }
}

/// Ordered chain of match strategies. The first strategy with exactly one
/// candidate decides.
pub struct Resolver {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::from_options(&ResolverOptions::default())
    }
}

impl Resolver {
    pub fn new(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Builds the chain in configured order. Repeated names keep their
    /// first position.
    pub fn from_options(options: &ResolverOptions) -> Self {
        let mut seen = Vec::new();
        let mut strategies: Vec<Box<dyn MatchStrategy>> = Vec::new();
        for kind in &options.strategies {
            if seen.contains(kind) {
                warn!(strategy = %kind, "ignoring repeated strategy");
                continue;
            }
            seen.push(*kind);
            let strategy: Box<dyn MatchStrategy> = match kind {
                StrategyKind::Identity => Box::new(IdentityMatch),
                StrategyKind::Code => Box::new(CodeMatch),
                StrategyKind::ExactName => Box::new(ExactNameMatch),
                StrategyKind::UniqueToken => Box::new(UniqueTokenMatch),
                StrategyKind::TokenSubset => Box::new(TokenSubsetMatch::new(options.subset_margin)),
                StrategyKind::Substring => Box::new(SubstringMatch::new(options.substring_min_len)),
            };
            strategies.push(strategy);
        }
        Self::new(strategies)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|strategy| strategy.name()).collect()
    }

    /// Runs the chain over `keys`.
    pub fn resolve(&self, keys: &KeySet, index: &CaseIndex) -> Resolution {
        let mut trace = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let candidates = strategy.candidates(keys, index);
            trace.push(StrategyAttempt {
                strategy: strategy.name(),
                candidates: candidates.len(),
            });
            if candidates.len() != 1 {
                continue;
            }
            if let Some(case_id) = candidates.into_iter().next() {
                return Resolution {
                    candidate: Some(MatchCandidate {
                        case_id,
                        strategy: strategy.name(),
                    }),
                    trace,
                };
            }
        }
        Resolution {
            candidate: None,
            trace,
        }
    }

    /// Resolves one record into a decision.
    pub fn decide(
        &self,
        natural_key: NaturalKey,
        keys: &KeySet,
        index: &CaseIndex,
    ) -> LinkageDecision {
        let resolution = self.resolve(keys, index);
        debug!(
            source = %natural_key.source(),
            matched = resolution.is_matched(),
            strategy = resolution.candidate.as_ref().map(|c| c.strategy),
            trace = ?resolution.trace,
            "record resolved"
        );
        resolution.into_decision(natural_key, keys)
    }
}
