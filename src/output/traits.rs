//! Exporter trait and error types

use crate::record::Record;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write spreadsheet: {0}")]
    Csv(#[from] csv::Error),

    #[error("Section lookup error: {0}")]
    Lookup(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a finished record collection somewhere
///
/// Exporters only read the collection; they never reorder or change it.
pub trait RecordExporter {
    /// Short name used in log lines
    fn name(&self) -> &str;

    fn export(&self, records: &[Record]) -> OutputResult<()>;
}
