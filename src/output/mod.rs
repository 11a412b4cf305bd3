//! Output module for exporting crawl results
//!
//! This module handles:
//! - Exporting the record collection as JSON
//! - Exporting the record collection as a spreadsheet
//! - Summarizing the collection at the end of a run

mod json;
mod spreadsheet;
pub mod stats;
mod traits;

pub use json::{save_json, write_json, JsonExporter};
pub use spreadsheet::{save_spreadsheet, write_spreadsheet, SpreadsheetExporter, HEADER};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, RecordExporter};

use crate::record::Record;

/// Runs every exporter over `records`, stopping at the first failure
pub fn export_all(exporters: &[Box<dyn RecordExporter>], records: &[Record]) -> OutputResult<()> {
    for exporter in exporters {
        tracing::debug!("Running {} exporter", exporter.name());
        exporter.export(records)?;
    }
    Ok(())
}
