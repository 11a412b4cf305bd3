//! JSON export
//!
//! The collection is serialized as-is, pretty-printed, with camelCase keys.

use crate::output::traits::{OutputResult, RecordExporter};
use crate::record::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `records` as a pretty-printed JSON array
pub fn write_json<W: Write>(writer: W, records: &[Record]) -> OutputResult<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

/// Saves `records` to a JSON file, replacing any existing file
pub fn save_json(path: &Path, records: &[Record]) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(&mut writer, records)?;
    writer.flush()?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// [`RecordExporter`] writing a JSON file
#[derive(Debug, Clone)]
pub struct JsonExporter {
    path: PathBuf,
}

impl JsonExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordExporter for JsonExporter {
    fn name(&self) -> &str {
        "json"
    }

    fn export(&self, records: &[Record]) -> OutputResult<()> {
        save_json(&self.path, records)
    }
}
