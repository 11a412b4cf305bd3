//! Spreadsheet export
//!
//! One header row, then one row per record in collection order. Written as
//! CSV; an optional UTF-8 byte order mark lets spreadsheet applications pick
//! up the Chinese headers correctly.

use crate::output::traits::{OutputResult, RecordExporter};
use crate::record::Record;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column headers: section, title, type, rent, contact, phone, link
pub const HEADER: [&str; 7] = ["區", "標題", "類型", "租金", "聯絡人", "電話", "連結"];

const BOM: &[u8] = b"\xEF\xBB\xBF";

fn row(record: &Record) -> [&str; 7] {
    [
        record.section.as_str(),
        record.title.as_str(),
        record.option_type.as_str(),
        record.price.as_str(),
        record.post_by.as_str(),
        record.phone.as_str(),
        record.url.as_str(),
    ]
}

/// Writes the header and one row per record
pub fn write_spreadsheet<W: Write>(writer: W, records: &[Record]) -> OutputResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;
    for record in records {
        csv.write_record(row(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Saves `records` as a spreadsheet file, replacing any existing file
pub fn save_spreadsheet(path: &Path, records: &[Record], with_bom: bool) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    if with_bom {
        writer.write_all(BOM)?;
    }
    write_spreadsheet(&mut writer, records)?;
    writer.flush()?;

    tracing::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// [`RecordExporter`] writing a spreadsheet file with a byte order mark
#[derive(Debug, Clone)]
pub struct SpreadsheetExporter {
    path: PathBuf,
    with_bom: bool,
}

impl SpreadsheetExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            with_bom: true,
        }
    }

    pub fn without_bom(mut self) -> Self {
        self.with_bom = false;
        self
    }
}

impl RecordExporter for SpreadsheetExporter {
    fn name(&self) -> &str {
        "spreadsheet"
    }

    fn export(&self, records: &[Record]) -> OutputResult<()> {
        save_spreadsheet(&self.path, records, self.with_bom)
    }
}
