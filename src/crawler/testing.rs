//! In-memory transports for crawler unit tests

use crate::crawler::fetcher::{RegionCookie, Transport};
use crate::crawler::PAGE_SIZE;
use crate::query::RequestParams;
use crate::ScoutError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

/// Renders a result page reporting `count` results and holding one fragment per id
pub(crate) fn listing_html(count: usize, ids: &[String]) -> String {
    let fragments: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<ul class="listInfo clearfix">
                    <li class="pull-left infoContent">
                        <h3><a href="//rent.example.com/rent-detail-{id}.html">Listing {id}</a></h3>
                        <p class="lightBox">整層住家 | 2房1廳 | 28坪 | 樓層：5/7</p>
                        <p class="lightBox">台中市西區</p>
                        <span><a data-text="{id}">收藏</a></span>
                    </li>
                    <li class="price">12,000 元/月</li>
                </ul>"#
            )
        })
        .collect();

    format!(
        r#"<html><body>
            <div class="pull-left hasData"><i>{count}</i></div>
            <div id="content">{fragments}</div>
        </body></html>"#
    )
}

/// Serves a listing of `total` results, paged by `firstRow`
///
/// Record ids look like `P{page}-{n}`. Optional per-page delays scramble
/// completion order; one page can be made to fail with a transport error.
pub(crate) struct ListingTransport {
    total: usize,
    delays: Vec<u64>,
    failing_page: Option<usize>,
    cookies: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ListingTransport {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            total,
            delays: Vec::new(),
            failing_page: None,
            cookies: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Milliseconds to stall each page, by page index
    pub(crate) fn with_delays(mut self, delays: Vec<u64>) -> Self {
        self.delays = delays;
        self
    }

    pub(crate) fn failing_on(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }

    pub(crate) fn request_count(&self) -> usize {
        self.cookies.lock().unwrap().len()
    }

    pub(crate) fn cookies(&self) -> Vec<String> {
        self.cookies.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn page_ids(total: usize, page: usize) -> Vec<String> {
        let start = page * PAGE_SIZE;
        let end = total.min(start + PAGE_SIZE);
        (start..end)
            .map(|n| format!("P{}-{}", page, n - start))
            .collect()
    }

    /// Every record id the listing holds, `R`-prefixed as extracted
    pub(crate) fn all_ids(total: usize) -> Vec<String> {
        (0..total.div_ceil(PAGE_SIZE))
            .flat_map(|page| Self::page_ids(total, page))
            .map(|id| format!("R{}", id))
            .collect()
    }
}

#[async_trait]
impl Transport for ListingTransport {
    async fn get(&self, url: &str, cookie: &RegionCookie) -> Result<String, ScoutError> {
        self.cookies.lock().unwrap().push(cookie.header_value());

        let parsed = Url::parse(url).map_err(|e| ScoutError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let page = RequestParams::from_url(&parsed).first_row / PAGE_SIZE;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(page).copied().unwrap_or(0);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_page == Some(page) {
            return Err(ScoutError::Transport {
                url: url.to_string(),
                message: "connection reset".to_string(),
            });
        }

        Ok(listing_html(self.total, &Self::page_ids(self.total, page)))
    }
}

/// Serves fixed bodies by exact URL; unknown URLs fail like a dead host
#[derive(Default)]
pub(crate) struct StaticTransport {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str, _cookie: &RegionCookie) -> Result<String, ScoutError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScoutError::Transport {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}
