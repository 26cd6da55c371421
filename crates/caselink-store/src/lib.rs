//! File-backed store and linkage writer.
//!
//! The store plays the external collaborators of the linkage engine: the
//! case registry, the unresolved-record sources and linkage persistence.
//! [`LinkageWriter`] applies resolver decisions to any [`LinkageStore`].

pub mod error;
pub mod linkages;
pub mod lock;
pub mod records;
pub mod registry;
pub mod store;
pub mod writer;

pub use error::{Result, StoreError};
pub use linkages::{Linkages, read_linkages, write_linkages};
pub use lock::{LOCK_FILE_NAME, RunLock};
pub use records::{RecordBatch, read_records, source_file_name};
pub use registry::{load_cases, registry_fingerprint};
pub use store::{
    CASES_FILE_NAME, CaseRegistry, FileStore, LINKAGES_FILE_NAME, LinkageStore, MemoryStore,
    RecordScope, RecordSource, apply_scope,
};
pub use writer::{
    BatchFailure, DEFAULT_BATCH_SIZE, LinkagePatch, LinkageWriter, WriteMode, WriteSummary,
    WriterOptions, set_manual_link,
};
