//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the partition loop that ties the crawl together:
//! - Splitting a query into one partition per section code
//! - Probing each partition for its result count
//! - Dispatching the page workers and stamping the section
//! - Optional detail enrichment of the finished collection
//!
//! Partitions run strictly one after another. `scrape_list` takes `&mut self`,
//! so a single [`Scout`] can never crawl two partitions at once.

use crate::config::{Config, CrawlerConfig, TransportPolicy};
use crate::crawler::detail::DetailEnricher;
use crate::crawler::dispatcher::{DispatchOptions, Dispatcher};
use crate::crawler::fetcher::{build_http_client, HttpTransport, RegionCookie, Transport};
use crate::crawler::prober::probe;
use crate::query::{split_sections, Query};
use crate::record::{stamp_section, Record};
use crate::state::CrawlSession;
use crate::ScoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// The crawl engine
pub struct Scout {
    transport: Arc<dyn Transport>,
    cookie: RegionCookie,
    session: CrawlSession,
    crawler: CrawlerConfig,
}

impl Scout {
    /// Creates an engine backed by a reqwest client built from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Scout)` - Ready to crawl, cookie set to the configured region
    /// * `Err(ScoutError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, ScoutError> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;

        let mut scout = Self::with_transport(config.crawler.clone(), Arc::new(HttpTransport::new(client)));
        scout.set_region_cookie(config.query.region);
        Ok(scout)
    }

    /// Creates an engine over an arbitrary transport
    pub fn with_transport(crawler: CrawlerConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cookie: RegionCookie::default(),
            session: CrawlSession::new(),
            crawler,
        }
    }

    /// Sets the region cookie sent with every subsequent request
    pub fn set_region_cookie(&mut self, region: u32) {
        self.cookie = RegionCookie::new(region);
    }

    pub fn region_cookie(&self) -> &RegionCookie {
        &self.cookie
    }

    /// Counters for the most recent partition
    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    /// Crawls every section partition of `query`
    ///
    /// The region cookie is taken from the query. Records come back grouped by
    /// section in the order the codes were given, each stamped with its code.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Record>)` - The full collection
    /// * `Err(ScoutError)` - The query could not be encoded, or a request
    ///   failed under [`TransportPolicy::Abort`]
    pub async fn scrape_list(&mut self, query: &Query) -> Result<Vec<Record>, ScoutError> {
        self.set_region_cookie(query.region);

        let start_time = Instant::now();
        let partitions = split_sections(query);
        let mut results = Vec::new();

        tracing::info!(
            "Crawling {} partition(s) in region {}",
            partitions.len(),
            query.region
        );

        for partition in &partitions {
            let url = partition.url()?;

            let mut records = match self.scrape_url(url).await {
                Ok(records) => records,
                Err(e) if e.is_transport() && self.crawler.transport_policy == TransportPolicy::SkipPage => {
                    tracing::warn!("Skipping section {:?}: {}", partition.section, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            stamp_section(&mut records, &partition.section);
            results.extend(records);
            self.session.complete_partition();
        }

        tracing::info!(
            "Crawl completed: {} records in {:?}",
            results.len(),
            start_time.elapsed()
        );

        Ok(results)
    }

    /// Probes and crawls a single partition URL
    ///
    /// Records are returned unstamped.
    pub async fn scrape_url(&mut self, url: Url) -> Result<Vec<Record>, ScoutError> {
        self.session.reset(url.clone());

        let totals = probe(self.transport.as_ref(), &self.cookie, &url).await?;
        self.session.record_probe(totals.total_records, totals.total_pages);

        tracing::info!(
            "Total Page: {} | Total Record: {}",
            totals.total_pages,
            totals.total_records
        );
        tracing::info!("Query URL: {}", url);

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.transport),
            self.cookie.clone(),
            self.dispatch_options(),
        );

        dispatcher.dispatch(&url, totals.total_pages).await
    }

    /// Fills in one record from its detail page
    pub async fn enrich(&self, record: &mut Record) -> Result<(), ScoutError> {
        self.enricher().enrich(record).await
    }

    /// Fills in every record from its detail page, in place
    pub async fn enrich_many(&self, records: &mut [Record]) -> Result<(), ScoutError> {
        tracing::info!("Fetching {} detail page(s)", records.len());
        self.enricher().enrich_many(records).await
    }

    /// Crawls `query` and, when configured, enriches the results
    pub async fn run(&mut self, query: &Query) -> Result<Vec<Record>, ScoutError> {
        let mut records = self.scrape_list(query).await?;

        if self.crawler.enrich_details {
            self.enrich_many(&mut records).await?;
        }

        Ok(records)
    }

    fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            max_concurrent_pages: self.crawler.max_concurrent_pages,
            transport_policy: self.crawler.transport_policy,
            page_order: self.crawler.page_order(),
        }
    }

    fn enricher(&self) -> DetailEnricher {
        DetailEnricher::new(
            Arc::clone(&self.transport),
            self.cookie.clone(),
            self.crawler.enrich_concurrency,
            self.crawler.transport_policy,
        )
    }
}
