//! Data model for linking external records to canonical cases.

pub mod case;
pub mod decision;
pub mod error;
pub mod ids;
pub mod keys;
pub mod record;

pub use case::Case;
pub use decision::{LinkOrigin, LinkageDecision, LinkageEntry, MatchCandidate};
pub use error::{ModelError, Result};
pub use ids::{CaseId, NaturalKey};
pub use keys::KeySet;
pub use record::{CallRecord, DocumentRecord, EmailRecord, ExternalRecord, SourceKind};
