//! CLI argument definitions for the case linkage job.

use std::path::PathBuf;

use caselink_model::SourceKind;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "caselink",
    version,
    about = "Link e-mails, calls and documents to their cases",
    long_about = "Link e-mails, phone calls and documents to the cases they belong to.\n\n\
                  Runs are dry runs unless --commit is given. Records that match no\n\
                  case, or more than one, are left unlinked and reported."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow record labels, e-mail addresses and phone numbers in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve unlinked records and optionally write the linkages.
    Run(RunArgs),

    /// Link one record to a case by hand.
    Link(LinkArgs),

    /// Build the case index and show its statistics and ambiguous keys.
    Index(IndexArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Data directory holding cases.csv, the record sources and linkages.json.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Config file (default: <DIR>/caselink.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only process records of this source.
    #[arg(long = "source", value_enum)]
    pub source: Option<SourceArg>,

    /// Process at most this many records.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Write linkages. Without this flag the run only reports.
    #[arg(long = "commit")]
    pub commit: bool,

    /// Print the run summary as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Re-resolve already linked records too.
    #[arg(long = "all")]
    pub all: bool,

    /// Number of unmatched labels to list (overrides the config file).
    #[arg(long = "top", value_name = "N")]
    pub top: Option<usize>,
}

#[derive(Parser)]
pub struct LinkArgs {
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Source of the record.
    #[arg(long = "source", value_enum)]
    pub source: SourceArg,

    /// Natural key of the record: message id, call id or storage path.
    #[arg(long = "key", value_name = "KEY")]
    pub key: String,

    /// Case id from cases.csv.
    #[arg(long = "case", value_name = "ID")]
    pub case: String,
}

#[derive(Parser)]
pub struct IndexArgs {
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,

    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the statistics as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Email,
    Call,
    Document,
}

impl SourceArg {
    pub fn kind(self) -> SourceKind {
        match self {
            Self::Email => SourceKind::Email,
            Self::Call => SourceKind::Call,
            Self::Document => SourceKind::Document,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
