//! Linkage run pipeline with explicit stages.
//!
//! A run goes through these stages in order:
//! 1. **Registry**: load `cases.csv` and build the case index
//! 2. **Sweep**: read each record source, apply the scope and limit,
//!    extract keys and resolve every record
//! 3. **Write**: plan linkage patches and apply them (commit mode only)
//! 4. **Report**: aggregate the decisions
//!
//! Registry, source and lock failures abort the run before anything is
//! written. Bad records and failed batches are counted and reported.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use caselink_ingest::{Adapters, InputError};
use caselink_map::{CaseIndex, Resolver};
use caselink_model::{Case, CaseId, LinkageDecision, NaturalKey, SourceKind};
use caselink_normalization::{CodeScanner, NameNormalizer};
use caselink_report::RunReport;
use caselink_store::{
    CaseRegistry, FileStore, LinkagePatch, LinkageStore, LinkageWriter, Linkages, RecordScope,
    RecordSource, WriteMode, WriteSummary, apply_scope, registry_fingerprint, set_manual_link,
};
use chrono::Utc;
use indicatif::ProgressBar;
use tracing::{debug, info, info_span, trace, warn};

use crate::config::{ConfigError, LinkConfig};
use crate::logging::redact_value;
use crate::types::{IndexSummary, RunSummary, SourceSummary};

/// Components built once from the configuration.
#[derive(Debug)]
pub struct Engine {
    pub names: NameNormalizer,
    pub adapters: Adapters,
    pub resolver: Resolver,
    pub writer: LinkageWriter,
    pub top_unmatched: usize,
}

impl Engine {
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if a configured code pattern does
    /// not compile.
    pub fn from_config(config: &LinkConfig) -> std::result::Result<Self, ConfigError> {
        let names = NameNormalizer::new(&config.normalization);
        let codes = CodeScanner::new(&config.codes)?;
        let adapters = Adapters::new(&config.adapter_options(), &names, &codes);
        Ok(Self {
            names,
            adapters,
            resolver: Resolver::from_options(&config.resolver),
            writer: LinkageWriter::new(config.writer.clone()),
            top_unmatched: config.report.top_unmatched,
        })
    }
}

/// What `caselink run` should do.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub data_dir: PathBuf,
    /// Sources swept, in order.
    pub sources: Vec<SourceKind>,
    /// Maximum number of records processed across all sources.
    pub limit: Option<usize>,
    pub mode: WriteMode,
    pub scope: RecordScope,
}

impl RunRequest {
    /// A dry run over every source and every unlinked record.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sources: SourceKind::ALL.to_vec(),
            limit: None,
            mode: WriteMode::DryRun,
            scope: RecordScope::Unlinked,
        }
    }
}

// ============================================================================
// Stage 1: Registry
// ============================================================================

/// Loaded registry and its index.
#[derive(Debug)]
pub struct RegistryState {
    pub cases: Vec<Case>,
    pub index: CaseIndex,
    pub fingerprint: String,
}

/// Loads the case registry and builds the index.
///
/// # Errors
///
/// Fails if the registry cannot be read or contains duplicate case ids.
pub fn load_registry(registry: &dyn CaseRegistry, names: &NameNormalizer) -> Result<RegistryState> {
    let cases = registry.load_cases().context("load case registry")?;
    let index = CaseIndex::build(&cases, names).context("build case index")?;
    let fingerprint = registry_fingerprint(&cases);
    Ok(RegistryState {
        cases,
        index,
        fingerprint,
    })
}

// ============================================================================
// Stage 2: Sweep
// ============================================================================

/// Decisions and per-source counts of one sweep.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    pub decisions: Vec<LinkageDecision>,
    pub sources: Vec<SourceSummary>,
    pub interrupted: bool,
}

/// Resolves the in-scope records of every requested source.
///
/// Records are resolved independently against the read-only index, so
/// the outcome of a record does not depend on which records precede it.
/// `stop` is checked before each record.
///
/// # Errors
///
/// Fails if a source exists but cannot be read.
pub fn sweep(
    records: &dyn RecordSource,
    existing: &Linkages,
    index: &CaseIndex,
    engine: &Engine,
    request: &RunRequest,
    stop: &AtomicBool,
    progress: &ProgressBar,
) -> Result<SweepOutcome> {
    let mut outcome = SweepOutcome::default();
    let mut remaining = request.limit.unwrap_or(usize::MAX);

    for &kind in &request.sources {
        if stop.load(Ordering::SeqCst) {
            outcome.interrupted = true;
            break;
        }
        let span = info_span!("sweep", source = %kind);
        let _guard = span.enter();
        let start = Instant::now();

        let batch = records
            .load_records(kind)
            .with_context(|| format!("read {kind} records"))?;
        let mut summary = SourceSummary::new(kind);
        summary.loaded = batch.records.len();
        let batch = apply_scope(batch, existing, request.scope);
        summary.in_scope = batch.records.len();
        summary.rejected = batch.rejected.len();
        for error in &batch.rejected {
            log_rejected(error);
        }

        let take = batch.records.len().min(remaining);
        progress.inc_length(take as u64);
        progress.set_message(kind.as_str());
        for record in batch.records.into_iter().take(take) {
            if stop.load(Ordering::SeqCst) {
                outcome.interrupted = true;
                break;
            }
            remaining -= 1;
            summary.processed += 1;
            progress.inc(1);

            let resolved = engine.adapters.extract(&record).and_then(|keys| {
                let natural_key = record
                    .natural_key()
                    .map_err(|_| InputError::MissingKey { kind, field: "id" })?;
                Ok(engine.resolver.decide(natural_key, &keys, index))
            });
            match resolved {
                Ok(decision) => {
                    if decision.is_matched() {
                        summary.matched += 1;
                    } else {
                        summary.unmatched += 1;
                        trace!(
                            label = redact_value(decision.label.as_deref().unwrap_or("")),
                            "record left unmatched"
                        );
                    }
                    outcome.decisions.push(decision);
                }
                Err(error) => {
                    summary.rejected += 1;
                    log_rejected(&error);
                }
            }
        }

        if summary.rejected > 0 {
            warn!(rejected = summary.rejected, "skipped unusable records");
        }
        info!(
            loaded = summary.loaded,
            in_scope = summary.in_scope,
            processed = summary.processed,
            matched = summary.matched,
            duration_ms = start.elapsed().as_millis() as u64,
            "source swept"
        );
        outcome.sources.push(summary);
        if outcome.interrupted {
            break;
        }
    }
    if outcome.interrupted {
        warn!("interrupted, remaining records left for the next run");
    }
    Ok(outcome)
}

fn log_rejected(error: &InputError) {
    match error {
        // Parser messages can quote record content.
        InputError::Malformed { line, .. } => {
            debug!(line, error = redact_value(&error.to_string()), "rejected record");
        }
        _ => debug!(error = %error, "rejected record"),
    }
}

// ============================================================================
// Stages 3 and 4: Write and report
// ============================================================================

/// Runs the whole job against a data directory.
///
/// In commit mode the run lock is held from before the linkages are read
/// until the last batch is written.
///
/// # Errors
///
/// Fails on fatal conditions only: a missing data directory, an
/// unreadable registry or source, duplicate case ids, a held run lock or
/// unreadable stored linkages.
pub fn run_linkage(
    request: &RunRequest,
    engine: &Engine,
    stop: &Arc<AtomicBool>,
    progress: &ProgressBar,
) -> Result<RunSummary> {
    let started_at = Utc::now();
    let span = info_span!("run", mode = %request.mode, scope = request.scope.as_str());
    let _guard = span.enter();
    let start = Instant::now();

    let mut store = FileStore::open(&request.data_dir).context("open data directory")?;
    let registry = load_registry(&store, &engine.names)?;
    let _lock = match request.mode {
        WriteMode::Commit => Some(store.lock().context("acquire run lock")?),
        WriteMode::DryRun => None,
    };
    let existing = store.linkages().context("read stored linkages")?;

    let outcome = sweep(
        &store,
        &existing,
        &registry.index,
        engine,
        request,
        stop,
        progress,
    )?;

    let write = write_decisions(&outcome, engine, request.mode, &mut store, stop)?;
    let report = RunReport::from_decisions(&outcome.decisions, engine.top_unmatched);

    info!(
        records = report.total,
        matched = report.matched,
        unmatched = report.unmatched,
        written = write.written,
        duration_ms = start.elapsed().as_millis() as u64,
        "run finished"
    );

    Ok(RunSummary {
        started_at,
        finished_at: Utc::now(),
        data_dir: request.data_dir.clone(),
        mode: request.mode,
        scope: request.scope,
        limit: request.limit,
        case_count: registry.cases.len(),
        registry_fingerprint: registry.fingerprint,
        strategies: engine.resolver.strategy_names(),
        sources: outcome.sources,
        interrupted: outcome.interrupted,
        report,
        write,
    })
}

/// Applies the decisions of a sweep.
///
/// An interrupt during the sweep only stops resolution: the flag is
/// cleared so the decisions already made are written, and a second
/// interrupt stops the writer after its current batch.
///
/// # Errors
///
/// Fails if the stored linkages cannot be read.
pub fn write_decisions(
    outcome: &SweepOutcome,
    engine: &Engine,
    mode: WriteMode,
    store: &mut dyn LinkageStore,
    stop: &Arc<AtomicBool>,
) -> Result<WriteSummary> {
    if outcome.interrupted {
        stop.store(false, Ordering::SeqCst);
        info!(
            decisions = outcome.decisions.len(),
            "writing decisions resolved before the interrupt"
        );
    }
    let writer = engine.writer.clone().with_stop_flag(Arc::clone(stop));
    writer
        .write(&outcome.decisions, mode, store, Utc::now())
        .context("write linkages")
}

/// Records an operator-made linkage after checking the case exists.
///
/// # Errors
///
/// Fails if the key or case id is blank, the case is not in the
/// registry, the run lock is held or the write fails.
pub fn link_record(
    data_dir: &Path,
    source: SourceKind,
    key: &str,
    case_id: &str,
) -> Result<LinkagePatch> {
    let mut store = FileStore::open(data_dir).context("open data directory")?;
    let natural_key = NaturalKey::new(source, key).context("invalid record key")?;
    let case_id = CaseId::new(case_id).context("invalid case id")?;

    let cases = store.load_cases().context("load case registry")?;
    if !cases.iter().any(|case| case.id == case_id) {
        bail!("case {case_id} is not in the registry");
    }

    let _lock = store.lock().context("acquire run lock")?;
    set_manual_link(&mut store, natural_key, case_id, Utc::now()).context("write linkage")
}

/// Builds the index and collects its statistics.
///
/// # Errors
///
/// Fails if the registry cannot be loaded or indexed.
pub fn inspect_index(data_dir: &Path, engine: &Engine) -> Result<IndexSummary> {
    let store = FileStore::open(data_dir).context("open data directory")?;
    let registry = load_registry(&store, &engine.names)?;
    Ok(IndexSummary {
        data_dir: data_dir.to_path_buf(),
        case_count: registry.cases.len(),
        stats: registry.index.stats(),
        ambiguous: registry.index.ambiguous_keys(),
        registry_fingerprint: registry.fingerprint,
    })
}
