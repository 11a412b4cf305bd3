//! Page prober
//!
//! The first request of every partition only reads the result count. A page
//! without a readable count is treated as an empty partition, not an error.

use crate::crawler::document::{last_text, with_document, Markup};
use crate::crawler::fetcher::{RegionCookie, Transport};
use crate::crawler::PAGE_SIZE;
use crate::record::normalize_text;
use crate::ScoutError;
use url::Url;

/// Element reporting the total number of results
const RECORD_COUNT: &str = ".pull-left.hasData > i";

/// Record and page totals for one partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub total_records: usize,
    pub total_pages: usize,
}

impl ProbeResult {
    /// Derives the page count for `total_records` results
    pub fn from_records(total_records: usize) -> Self {
        Self {
            total_records,
            total_pages: page_count(total_records),
        }
    }
}

/// Number of pages needed for `total_records` results
pub fn page_count(total_records: usize) -> usize {
    total_records.div_ceil(PAGE_SIZE)
}

/// Fetches the partition's first page and reads its result count
///
/// # Returns
///
/// * `Ok(ProbeResult)` - The totals, zero if the page has no count
/// * `Err(ScoutError)` - The request itself failed
pub async fn probe(
    transport: &dyn Transport,
    cookie: &RegionCookie,
    partition_url: &Url,
) -> Result<ProbeResult, ScoutError> {
    let body = transport.get(partition_url.as_str(), cookie).await?;
    Ok(read_probe(&body))
}

/// Reads the result count out of a page body
pub fn read_probe(html: &str) -> ProbeResult {
    ProbeResult::from_records(with_document(html, record_count))
}

/// Parses the result count, stripping thousands separators
pub fn record_count(page: &dyn Markup) -> usize {
    let Some(text) = last_text(page, RECORD_COUNT) else {
        tracing::debug!("No result count on page; treating partition as empty");
        return 0;
    };

    let digits = normalize_text(&text).replace(',', "");
    match digits.parse() {
        Ok(count) => count,
        Err(_) => {
            tracing::debug!("Unreadable result count {:?}; treating partition as empty", text);
            0
        }
    }
}
