//! Case registry index and strategy chain resolver.
//!
//! [`CaseIndex`] is built once from the registry and passed by reference
//! into [`Resolver::resolve`]; nothing here holds global state.

pub mod error;
pub mod index;
pub mod resolver;
pub mod strategies;

pub use error::{IndexError, Result};
pub use index::{AmbiguousKey, CaseIndex, IndexStat, KeyIndex, NamedCase, Slot};
pub use resolver::{Resolution, Resolver, ResolverOptions, StrategyAttempt, StrategyKind};
pub use strategies::{
    CodeMatch, ExactNameMatch, IdentityMatch, MatchStrategy, SubstringMatch, TokenSubsetMatch,
    UniqueTokenMatch,
};
