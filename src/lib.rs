//! Concurrent per-year summaries of timestamped weather observations.
//!
//! Records are filtered to a year range, partitioned by year, reduced to
//! averages and extremes on a worker pool (one task per year) and merged into
//! an [`models::OverallSummary`].

pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
pub use models::{ClimateRecord, OverallSummary, YearSummary};
pub use processors::ClimateSummarizer;
