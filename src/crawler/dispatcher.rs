//! Crawl dispatcher
//!
//! This module handles the page fan-out for one partition:
//! - One tokio task per page, each addressed by its `firstRow` offset
//! - An optional semaphore capping how many page workers run at once
//! - A completion barrier: `dispatch` returns only after every worker is done
//! - The transport failure policy (abort the partition or skip the page)

use crate::config::TransportPolicy;
use crate::crawler::aggregator::{PageOrder, ResultAggregator};
use crate::crawler::extractor::extract_page;
use crate::crawler::fetcher::{RegionCookie, Transport};
use crate::crawler::PAGE_SIZE;
use crate::query::set_first_row;
use crate::record::Record;
use crate::ScoutError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// Tunables for a dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Maximum in-flight page workers (0 = unbounded)
    pub max_concurrent_pages: usize,

    pub transport_policy: TransportPolicy,

    pub page_order: PageOrder,
}

/// Fans a partition out to one worker per page
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    cookie: RegionCookie,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, cookie: RegionCookie, options: DispatchOptions) -> Self {
        Self {
            transport,
            cookie,
            options,
        }
    }

    /// Fetches and parses pages `0..total_pages` of a partition
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Record>)` - Every record from every page that succeeded
    /// * `Err(ScoutError)` - A page failed under [`TransportPolicy::Abort`],
    ///   or a worker panicked. Remaining workers are aborted.
    pub async fn dispatch(
        &self,
        partition_url: &Url,
        total_pages: usize,
    ) -> Result<Vec<Record>, ScoutError> {
        let aggregator = Arc::new(ResultAggregator::new());
        let limiter = match self.options.max_concurrent_pages {
            0 => None,
            limit => Some(Arc::new(Semaphore::new(limit))),
        };

        let mut workers = JoinSet::new();

        for page in 0..total_pages {
            // Wait for a free slot before spawning so at most `limit` run at once.
            // Workers that finish meanwhile are settled first, so a fatal page
            // stops the fan-out before the next request goes out.
            let permit = match &limiter {
                Some(semaphore) => Some(loop {
                    tokio::select! {
                        biased;
                        Some(joined) = workers.join_next() => {
                            if let Err(e) = self.settle(joined) {
                                workers.abort_all();
                                return Err(e);
                            }
                        }
                        permit = Arc::clone(semaphore).acquire_owned() => break permit?,
                    }
                }),
                None => None,
            };

            let url = page_url(partition_url, page);
            let transport = Arc::clone(&self.transport);
            let cookie = self.cookie.clone();
            let aggregator = Arc::clone(&aggregator);

            workers.spawn(async move {
                let _permit = permit;
                let result = scrape_page(transport.as_ref(), &cookie, &url, page, &aggregator).await;
                (page, result)
            });
        }

        // Completion barrier
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = self.settle(joined) {
                workers.abort_all();
                return Err(e);
            }
        }

        Ok(aggregator.finish(self.options.page_order))
    }

    /// Applies the transport policy to one finished worker
    fn settle(
        &self,
        joined: Result<(usize, Result<(), ScoutError>), JoinError>,
    ) -> Result<(), ScoutError> {
        let (page, result) = joined?;
        let Err(e) = result else {
            return Ok(());
        };

        if e.is_transport() && self.options.transport_policy == TransportPolicy::SkipPage {
            tracing::warn!("Skipping page {}: {}", page, e);
            return Ok(());
        }

        tracing::error!("Page {} failed, aborting partition: {}", page, e);
        Err(e)
    }
}

/// URL of page `page` of a partition
pub fn page_url(partition_url: &Url, page: usize) -> Url {
    set_first_row(partition_url, page * PAGE_SIZE)
}

async fn scrape_page(
    transport: &dyn Transport,
    cookie: &RegionCookie,
    url: &Url,
    page: usize,
    aggregator: &ResultAggregator,
) -> Result<(), ScoutError> {
    tracing::debug!("Fetching page {}: {}", page, url);

    let body = transport.get(url.as_str(), cookie).await?;
    let records = extract_page(&body);

    tracing::debug!("Page {} yielded {} records", page, records.len());
    aggregator.merge(page, records);

    Ok(())
}
