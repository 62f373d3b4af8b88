//! Run artefacts: bulk-load tables in dependency order, the diagnostic
//! report, the dropped-record listing and the run summary.

pub mod frames;
pub mod writer;

pub use frames::OutputTable;
pub use writer::{
    DROPPED_RECORDS_FILE, OutputPaths, RUN_SUMMARY_FILE, UNMATCHED_VALUES_FILE, write_diagnostics,
    write_dropped, write_outputs, write_summary, write_tables,
};
