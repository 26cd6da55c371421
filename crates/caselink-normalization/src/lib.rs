//! Pure normalization functions for record linkage.
//!
//! Every function here is total: malformed input produces an empty string
//! or `None`, never a panic or an error.

pub mod codes;
pub mod email;
pub mod error;
pub mod folder;
pub mod name;
pub mod options;
pub mod phone;

pub use codes::{CodePatterns, CodeScanner, normalize_code};
pub use email::{email_domain, is_in_domain, normalize_email};
pub use error::{NormalizationError, Result};
pub use folder::normalize_folder_label;
pub use name::{NameNormalizer, is_generic_token, normalize_name, tokenize};
pub use options::NormalizationOptions;
pub use phone::normalize_phone;
