//! Command-line driver components for the job-posting pipeline.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
