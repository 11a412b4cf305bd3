use url::Url;

/// Per-partition crawl counters
///
/// A session lives for the duration of one section partition. It is reset
/// before each partition's probe and filled in once the probe returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSession {
    /// Total records the site reports for the current partition
    pub total_records: usize,

    /// Total pages derived from the record count
    pub total_pages: usize,

    /// URL of the partition being crawled
    pub query_url: Option<Url>,

    /// Partitions completed by the owning engine
    pub partitions_completed: usize,
}

impl CrawlSession {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the counters and points the session at a new partition
    pub fn reset(&mut self, query_url: Url) {
        self.total_records = 0;
        self.total_pages = 0;
        self.query_url = Some(query_url);
    }

    /// Records the outcome of a partition probe
    pub fn record_probe(&mut self, total_records: usize, total_pages: usize) {
        self.total_records = total_records;
        self.total_pages = total_pages;
    }

    /// Marks the current partition as finished
    pub fn complete_partition(&mut self) {
        self.partitions_completed += 1;
    }
}
