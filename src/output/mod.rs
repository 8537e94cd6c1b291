//! Output module for exporting crawl results
//!
//! This module handles:
//! - Writing collected records and per-item summaries as CSV
//! - Building safe, timestamped export file names

mod export;

pub use export::{sanitize_filename, write_csv};

use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No data to export")]
    Empty,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
