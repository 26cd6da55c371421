//! Source adapters for record linkage.
//!
//! Each adapter turns one kind of external record (e-mail message, phone
//! call, stored document) into a normalized [`caselink_model::KeySet`].

pub mod adapter;
pub mod call;
pub mod document;
pub mod email;
pub mod error;

pub use adapter::{AdapterOptions, Adapters, SourceAdapter};
pub use call::{CallAdapter, CallOptions};
pub use document::{
    DocumentAdapter, DocumentOptions, PathRule, SegmentMatcher, default_path_rules,
    folder_segments,
};
pub use email::{EmailAdapter, EmailOptions, strip_subject_prefixes};
pub use error::{InputError, Result};
