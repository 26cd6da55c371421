//! Idempotent, batched linkage writer.
//!
//! Decisions are collapsed per natural key, compared with the stored
//! linkages and turned into upsert patches. Patches equal to the stored
//! state are dropped, so applying the same decisions twice writes nothing
//! the second time.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use caselink_model::{CaseId, LinkOrigin, LinkageDecision, LinkageEntry, NaturalKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::error::Result;
use crate::linkages::Linkages;
use crate::store::LinkageStore;

pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Whether the writer touches the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Plan and report only.
    #[default]
    DryRun,
    Commit,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DryRun => "dry-run",
            Self::Commit => "commit",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub batch_size: usize,
    /// Keep operator-made linkages when a run resolves a record
    /// differently.
    pub protect_manual: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            protect_manual: true,
        }
    }
}

/// One upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkagePatch {
    pub natural_key: NaturalKey,
    pub entry: LinkageEntry,
}

/// A batch the store rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    /// Zero-based batch number.
    pub batch: usize,
    pub size: usize,
    pub error: String,
}

/// What the writer planned and did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub mode: WriteMode,
    /// Patches that differ from the stored state.
    pub planned: usize,
    /// Patches applied by successful batches.
    pub written: usize,
    /// Matched decisions already stored as-is.
    pub unchanged: usize,
    /// Matched decisions that would overwrite a manual linkage.
    pub protected: usize,
    /// Batches not attempted because the run was interrupted.
    pub skipped_batches: usize,
    pub failed_batches: Vec<BatchFailure>,
}

/// Plans linkage patches and applies them in bounded batches.
#[derive(Debug, Clone, Default)]
pub struct LinkageWriter {
    options: WriterOptions,
    stop: Option<Arc<AtomicBool>>,
}

impl LinkageWriter {
    pub fn new(options: WriterOptions) -> Self {
        Self {
            options,
            stop: None,
        }
    }

    /// Checked between batches; once set, remaining batches are skipped.
    #[must_use]
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Computes the patches for `decisions` against `existing`.
    ///
    /// The last decision for a natural key wins. Unmatched decisions never
    /// clear a stored linkage.
    pub fn plan(
        &self,
        decisions: &[LinkageDecision],
        existing: &Linkages,
        now: DateTime<Utc>,
    ) -> (Vec<LinkagePatch>, WriteSummary) {
        let mut latest: BTreeMap<&NaturalKey, &LinkageDecision> = BTreeMap::new();
        for decision in decisions {
            latest.insert(&decision.natural_key, decision);
        }

        let mut summary = WriteSummary::default();
        let mut patches = Vec::new();
        for (key, decision) in latest {
            let Some(case_id) = decision.case_id.as_ref() else {
                continue;
            };
            match existing.get(key) {
                Some(stored) if &stored.case_id == case_id => summary.unchanged += 1,
                Some(stored) if stored.origin == LinkOrigin::Manual && self.options.protect_manual => {
                    summary.protected += 1;
                }
                _ => patches.push(LinkagePatch {
                    natural_key: key.clone(),
                    entry: LinkageEntry {
                        case_id: case_id.clone(),
                        strategy: decision.strategy.clone(),
                        origin: LinkOrigin::Automated,
                        linked_at: now,
                    },
                }),
            }
        }
        summary.planned = patches.len();
        (patches, summary)
    }

    /// Plans and, in commit mode, applies the decisions.
    ///
    /// A failing batch is recorded in [`WriteSummary::failed_batches`] and
    /// the remaining batches are still attempted.
    ///
    /// # Errors
    ///
    /// Returns an error only if the stored linkages cannot be read.
    pub fn write(
        &self,
        decisions: &[LinkageDecision],
        mode: WriteMode,
        store: &mut dyn LinkageStore,
        now: DateTime<Utc>,
    ) -> Result<WriteSummary> {
        let span = info_span!("write_linkages", %mode, decision_count = decisions.len());
        let _guard = span.enter();
        let start = Instant::now();

        let existing = store.linkages()?;
        let (patches, mut summary) = self.plan(decisions, &existing, now);
        summary.mode = mode;
        if mode == WriteMode::DryRun {
            info!(
                planned = summary.planned,
                unchanged = summary.unchanged,
                protected = summary.protected,
                "dry run, no linkages written"
            );
            return Ok(summary);
        }

        let batch_size = self.options.batch_size.max(1);
        let batch_count = patches.len().div_ceil(batch_size);
        for (batch, chunk) in patches.chunks(batch_size).enumerate() {
            if self.stop_requested() {
                summary.skipped_batches = batch_count - batch;
                warn!(
                    skipped_batches = summary.skipped_batches,
                    "interrupted, remaining batches skipped"
                );
                break;
            }
            match store.apply_batch(chunk) {
                Ok(()) => summary.written += chunk.len(),
                Err(err) => {
                    warn!(batch, size = chunk.len(), error = %err, "linkage batch failed");
                    summary.failed_batches.push(BatchFailure {
                        batch,
                        size: chunk.len(),
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            written = summary.written,
            failed_batches = summary.failed_batches.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "linkages committed"
        );
        Ok(summary)
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::SeqCst))
    }
}

/// Records an operator-made linkage, replacing any existing one.
///
/// # Errors
///
/// Returns the store error if the write fails.
pub fn set_manual_link(
    store: &mut dyn LinkageStore,
    natural_key: NaturalKey,
    case_id: CaseId,
    now: DateTime<Utc>,
) -> Result<LinkagePatch> {
    let patch = LinkagePatch {
        natural_key,
        entry: LinkageEntry {
            case_id,
            strategy: None,
            origin: LinkOrigin::Manual,
            linked_at: now,
        },
    };
    store.apply_batch(std::slice::from_ref(&patch))?;
    info!(source = %patch.natural_key.source(), "manual linkage recorded");
    Ok(patch)
}
