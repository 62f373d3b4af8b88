//! Batch driver and combiner.
//!
//! [`run`] takes discovered sources through mapping, the per-record stages
//! and the combiner. Per-record stages are data-parallel; the combiner is
//! the single barrier of a run.

pub mod combine;
pub mod driver;
pub mod pipeline;

pub use combine::combine;
pub use driver::{
    RunOutput, SourceResult, check_source, process_batch, process_source, run,
    run_with_progress,
};
pub use pipeline::{ProcessedRecord, RecordPipeline};
