//! Crawler module for paginated listing searches
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport with the region cookie
//! - Result-count probing and page fan-out
//! - Listing fragment extraction
//! - Detail page enrichment
//! - Overall crawl coordination

mod aggregator;
mod coordinator;
mod detail;
mod dispatcher;
mod document;
mod extractor;
mod fetcher;
mod prober;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{PageOrder, ResultAggregator};
pub use coordinator::Scout;
pub use detail::{extract_detail, fetch_detail, read_detail, DetailEnricher, DetailFields};
pub use dispatcher::{page_url, DispatchOptions, Dispatcher};
pub use document::{with_document, Markup};
pub use extractor::{extract, extract_fragment, extract_page, parse_description};
pub use fetcher::{build_http_client, HttpTransport, RegionCookie, Transport, REGION_COOKIE};
pub use prober::{page_count, probe, read_probe, ProbeResult};

use crate::areas::SectionDirectory;
use crate::config::Config;
use crate::output::{export_all, JsonExporter, RecordExporter, SpreadsheetExporter};
use crate::record::Record;
use crate::ScoutError;
use std::path::Path;

/// Listings per result page
pub const PAGE_SIZE: usize = 30;

/// Runs a complete crawl operation
///
/// This is the main entry point for a configured crawl. It will:
/// 1. Load the area list, if one is configured
/// 2. Build the HTTP client and crawl every section partition
/// 3. Enrich the records from their detail pages, if enabled
/// 4. Replace section codes with their names
/// 5. Write the JSON and spreadsheet exports
///
/// # Returns
///
/// * `Ok(Vec<Record>)` - The exported collection
/// * `Err(ScoutError)` - The crawl or an export failed
pub async fn crawl(config: &Config) -> Result<Vec<Record>, ScoutError> {
    // A bad area list fails before any request goes out
    let directory = match &config.output.areas_path {
        Some(path) => Some(SectionDirectory::load(Path::new(path))?),
        None => None,
    };

    let mut scout = Scout::new(config)?;
    let mut records = scout.run(&config.query).await?;

    if let Some(directory) = &directory {
        directory.replace_sections(&mut records);
    }

    let exporters: Vec<Box<dyn RecordExporter>> = vec![
        Box::new(JsonExporter::new(config.output.json_file())),
        Box::new(SpreadsheetExporter::new(config.output.spreadsheet_file())),
    ];
    export_all(&exporters, &records)?;

    Ok(records)
}
