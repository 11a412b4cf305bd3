//! State module for tracking crawl progress
//!
//! `CrawlSession` holds the counters for the partition currently being crawled.
//! It is owned by a single `Scout`; partitions never share a session.

mod session;

pub use session::CrawlSession;
