//! Run reporting for linkage decisions.
//!
//! [`RunReport`] is a pure aggregation over the decisions of one run:
//! totals, per-source and per-strategy counts, and the most frequent
//! unmatched labels. It is serializable for `--json` output and renders
//! to plain text for non-interactive output.

mod report;
mod text;

pub use report::{DEFAULT_TOP_UNMATCHED, LabelCount, NO_LABEL, RunReport, SourceCounts};
