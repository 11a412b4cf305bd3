//! Detail enricher
//!
//! Fills in phone, community and layout from a record's detail page. The
//! record is updated in place; nothing else about it changes.

use crate::config::TransportPolicy;
use crate::crawler::document::{first_attr, with_document, Markup};
use crate::crawler::fetcher::{RegionCookie, Transport};
use crate::record::{normalize_text, Record, PHONE_UNAVAILABLE};
use crate::ScoutError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

const PHONE: &str = "#main .main_house_info.clearfix .detailBox.clearfix .rightBox .dialPhoneNum";
const ATTRIBUTES: &str = ".detailInfo ul.attr li";

const COMMUNITY_LABEL: &str = "社區";
const LAYOUT_LABEL: &str = "格局";

/// Fields read from a detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub phone: String,
    pub community: String,
    pub layout: String,
}

impl DetailFields {
    /// Writes the fields into `record`
    pub fn apply(self, record: &mut Record) {
        record.phone = self.phone;
        record.community = self.community;
        record.layout = self.layout;
    }
}

/// Parses a detail page body
pub fn read_detail(html: &str) -> DetailFields {
    with_document(html, extract_detail)
}

/// Reads phone, community and layout from a detail page
///
/// A missing phone becomes [`PHONE_UNAVAILABLE`]; a missing community or
/// layout stays empty.
pub fn extract_detail(page: &dyn Markup) -> DetailFields {
    let phone = first_attr(page, PHONE, "data-value")
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| PHONE_UNAVAILABLE.to_string());

    let mut fields = DetailFields {
        phone,
        ..DetailFields::default()
    };

    for item in page.select(ATTRIBUTES) {
        let text = item.text();
        let Some((label, value)) = text.split_once([':', '：']) else {
            continue;
        };

        match label.trim() {
            COMMUNITY_LABEL => fields.community = normalize_text(value.trim()),
            LAYOUT_LABEL => fields.layout = normalize_text(value.trim()),
            _ => {}
        }
    }

    fields
}

/// Fetches the detail page for `url`
pub async fn fetch_detail(
    transport: &dyn Transport,
    cookie: &RegionCookie,
    url: &str,
) -> Result<DetailFields, ScoutError> {
    let body = transport.get(url, cookie).await?;
    Ok(read_detail(&body))
}

/// Enriches records from their detail pages
pub struct DetailEnricher {
    transport: Arc<dyn Transport>,
    cookie: RegionCookie,
    concurrency: usize,
    policy: TransportPolicy,
}

impl DetailEnricher {
    pub fn new(
        transport: Arc<dyn Transport>,
        cookie: RegionCookie,
        concurrency: usize,
        policy: TransportPolicy,
    ) -> Self {
        Self {
            transport,
            cookie,
            concurrency: concurrency.max(1),
            policy,
        }
    }

    /// Enriches a single record in place
    pub async fn enrich(&self, record: &mut Record) -> Result<(), ScoutError> {
        let fields = fetch_detail(self.transport.as_ref(), &self.cookie, &record.url).await?;
        fields.apply(record);
        Ok(())
    }

    /// Enriches every record in place
    ///
    /// Sequential unless the enricher was built with a concurrency above 1.
    /// Collection order is never changed.
    pub async fn enrich_many(&self, records: &mut [Record]) -> Result<(), ScoutError> {
        if self.concurrency == 1 {
            for record in records.iter_mut() {
                if let Err(e) = self.enrich(record).await {
                    self.handle_failure(&record.url, e)?;
                }
            }
            return Ok(());
        }

        let limiter = Arc::new(Semaphore::new(self.concurrency));
        let mut workers = JoinSet::new();

        for index in 0..records.len() {
            // Finished lookups are applied while waiting for a slot
            let permit = loop {
                tokio::select! {
                    biased;
                    Some(joined) = workers.join_next() => {
                        if let Err(e) = self.settle(records, joined) {
                            workers.abort_all();
                            return Err(e);
                        }
                    }
                    permit = Arc::clone(&limiter).acquire_owned() => break permit?,
                }
            };

            let transport = Arc::clone(&self.transport);
            let cookie = self.cookie.clone();
            let url = records[index].url.clone();

            workers.spawn(async move {
                let _permit = permit;
                let result = fetch_detail(transport.as_ref(), &cookie, &url).await;
                (index, result)
            });
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = self.settle(records, joined) {
                workers.abort_all();
                return Err(e);
            }
        }

        Ok(())
    }

    /// Applies one finished lookup to its record by index
    fn settle(
        &self,
        records: &mut [Record],
        joined: Result<(usize, Result<DetailFields, ScoutError>), JoinError>,
    ) -> Result<(), ScoutError> {
        let (index, result) = joined?;
        match result {
            Ok(fields) => {
                fields.apply(&mut records[index]);
                Ok(())
            }
            Err(e) => self.handle_failure(&records[index].url, e),
        }
    }

    fn handle_failure(&self, url: &str, error: ScoutError) -> Result<(), ScoutError> {
        if error.is_transport() && self.policy == TransportPolicy::SkipPage {
            tracing::warn!("Skipping detail page {}: {}", url, error);
            return Ok(());
        }

        tracing::error!("Detail page {} failed: {}", url, error);
        Err(error)
    }
}
