use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use caselink_cli::config::load_config;
use caselink_cli::pipeline::{Engine, RunRequest, inspect_index, link_record, run_linkage};
use caselink_model::SourceKind;
use caselink_store::{RecordScope, WriteMode};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::cli::{IndexArgs, LinkArgs, RunArgs};
use crate::summary::{print_index_summary, print_run_summary};

pub fn run_linkage_job(args: &RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), &args.data_dir).context("load config")?;
    let mut engine = Engine::from_config(&config).context("prepare resolver")?;
    if let Some(top) = args.top {
        engine.top_unmatched = top;
    }

    let request = RunRequest {
        data_dir: args.data_dir.clone(),
        sources: match args.source {
            Some(source) => vec![source.kind()],
            None => SourceKind::ALL.to_vec(),
        },
        limit: args.limit,
        mode: if args.commit {
            WriteMode::Commit
        } else {
            WriteMode::DryRun
        },
        scope: if args.all {
            RecordScope::All
        } else {
            RecordScope::Unlinked
        },
    };

    let stop = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(&stop);
    let progress = progress_bar(args.json);
    let result = run_linkage(&request, &engine, &stop, &progress);
    progress.finish_and_clear();
    let summary = result?;

    if args.json {
        print_json(&summary)?;
    } else {
        print_run_summary(&summary);
    }
    Ok(())
}

pub fn run_link(args: &LinkArgs) -> Result<()> {
    let span = info_span!("link", source = %args.source.kind());
    let _guard = span.enter();
    let patch = link_record(&args.data_dir, args.source.kind(), &args.key, &args.case)?;
    info!(case_id = %patch.entry.case_id, "record linked");
    println!("Linked {} to case {}", patch.natural_key, patch.entry.case_id);
    Ok(())
}

pub fn run_index(args: &IndexArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), &args.data_dir).context("load config")?;
    let engine = Engine::from_config(&config).context("prepare resolver")?;
    let summary = inspect_index(&args.data_dir, &engine)?;
    if args.json {
        print_json(&summary)?;
    } else {
        print_index_summary(&summary);
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize summary")?;
    println!("{json}");
    Ok(())
}

/// The first Ctrl-C stops the sweep; a second stops the writer after its
/// current batch.
fn install_interrupt_handler(stop: &Arc<AtomicBool>) {
    let flag = Arc::clone(stop);
    let installed = ctrlc::set_handler(move || {
        eprintln!("\ninterrupt received, stopping after the current batch");
        flag.store(true, Ordering::SeqCst);
    });
    if let Err(error) = installed {
        warn!(error = %error, "could not install interrupt handler");
    }
}

fn progress_bar(json: bool) -> ProgressBar {
    if json || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let style = ProgressStyle::with_template("{spinner} {msg:<8} [{bar:40}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(0).with_style(style)
}
