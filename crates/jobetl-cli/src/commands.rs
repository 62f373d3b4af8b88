//! Subcommand implementations.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, trace};

use jobetl_core::{RunOutput, check_source, run_with_progress};
use jobetl_ingest::{discover_sources, source_from_path};
use jobetl_map::MappingReport;
use jobetl_model::{MatchingMode, PipelineOptions};
use jobetl_output::{OutputPaths, write_outputs};
use jobetl_standards::{LoadedFile, ReferenceRegistry, resolve_reference_root};

use crate::cli::{CheckMappingArgs, RunArgs};
use crate::logging::redact_value;

/// Everything `run` reports back to the operator.
#[derive(Debug)]
pub struct RunResult {
    pub input_dir: PathBuf,
    pub output: RunOutput,
    /// `None` on a dry run.
    pub written: Option<OutputPaths>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        self.output.summary.has_failures()
    }
}

pub fn load_references(reference_dir: Option<&Path>, mode: MatchingMode) -> Result<ReferenceRegistry> {
    let root = resolve_reference_root(reference_dir);
    ReferenceRegistry::load_with_mode(&root, mode)
        .with_context(|| format!("load reference tables from {}", root.display()))
}

fn options_from_args(args: &RunArgs) -> PipelineOptions {
    let mut options = if args.strict {
        PipelineOptions::strict()
    } else {
        PipelineOptions::new()
    };
    if let Some(years) = args.max_experience_years {
        options = options.with_max_experience_years(years);
    }
    options.with_parallel(!args.sequential)
}

fn progress_bar(len: usize) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

pub fn run_pipeline(args: &RunArgs, reference_dir: Option<&Path>) -> Result<RunResult> {
    let span = info_span!("run", input = %args.input_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let options = options_from_args(args);
    // Reference failures halt the run before any source is touched.
    let registry = load_references(reference_dir, options.matching_mode)?;
    let sources = discover_sources(&args.input_dir)
        .with_context(|| format!("discover sources in {}", args.input_dir.display()))?;
    if sources.is_empty() {
        bail!("no source files found in {}", args.input_dir.display());
    }
    info!(sources = sources.len(), "sources discovered");

    let bar = progress_bar(sources.len());
    let output = run_with_progress(&sources, &registry, &options, |source| {
        bar.set_message(source.name.clone());
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    for entry in output.diagnostics.entries() {
        trace!(
            field = entry.field.name(),
            raw_value = redact_value(&entry.raw_value),
            source = %entry.source,
            row = entry.row,
            kind = entry.kind.as_str(),
            "diagnostic"
        );
    }

    let written = if args.dry_run {
        None
    } else {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| args.input_dir.join("output"));
        Some(write_outputs(
            &output_dir,
            &output.tables,
            &output.diagnostics,
            &output.summary,
        )?)
    };

    info!(duration_ms = start.elapsed().as_millis(), "run finished");
    Ok(RunResult {
        input_dir: args.input_dir.clone(),
        output,
        written,
    })
}

pub fn run_check_mapping(args: &CheckMappingArgs) -> Result<MappingReport> {
    let source = source_from_path(&args.source, args.mapping.as_deref());
    check_source(&source).with_context(|| format!("check mapping for source '{}'", source.name))
}

pub fn run_references(reference_dir: Option<&Path>) -> Result<Vec<LoadedFile>> {
    let registry = load_references(reference_dir, MatchingMode::default())?;
    Ok(registry.files)
}
