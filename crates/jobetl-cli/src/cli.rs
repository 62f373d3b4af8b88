//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "jobetl",
    version,
    about = "Job-posting ETL - canonicalize, validate and decompose job postings",
    long_about = "Canonicalize job postings from several providers into one relational schema.\n\n\
                  Reads per-source CSV files with their column mappings, resolves every\n\
                  categorical value through the reference tables and writes bulk-load\n\
                  tables plus an unmatched-values report."
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

    /// Allow raw cell values in log output (redacted otherwise).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Reference table directory (default: $JOBETL_REFERENCE_DIR or ./reference).
    #[arg(long = "reference-dir", value_name = "DIR", global = true)]
    pub reference_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process every source in a folder and write the output tables.
    Run(RunArgs),

    /// Check one source's mapping configuration without processing records.
    CheckMapping(CheckMappingArgs),

    /// List the loaded reference tables with row counts and checksums.
    References,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Folder with `<source>.csv` files and their mappings.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output directory for generated files (default: <INPUT_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Match reference aliases exactly (no compact-key fallback).
    #[arg(long = "strict")]
    pub strict: bool,

    /// Upper plausibility bound for required experience, in years.
    #[arg(long = "max-experience-years", value_name = "YEARS")]
    pub max_experience_years: Option<f64>,

    /// Process records on one thread.
    #[arg(long = "sequential")]
    pub sequential: bool,
}

#[derive(Parser)]
pub struct CheckMappingArgs {
    /// Source CSV file.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Mapping configuration (default: discovered beside the source).
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,
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
