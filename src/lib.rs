//! Rent-Scout: a concurrent paginated listing crawler
//!
//! This crate crawls a paginated rental listing site. Each search is split into
//! one partition per section code, probed for its record count, and fanned out
//! to one worker per page. The workers parse listing fragments into typed
//! [`Record`]s, which can then be enriched from their detail pages and exported.

pub mod areas;
pub mod config;
pub mod crawler;
pub mod output;
pub mod query;
pub mod record;
pub mod state;

use thiserror::Error;

/// Main error type for Rent-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Concurrency limiter closed: {0}")]
    Limiter(#[from] tokio::sync::AcquireError),
}

impl ScoutError {
    /// Returns true if the error came from building or executing a request
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Http { .. } | Self::Reqwest(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Query-building errors
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Failed to encode query URL from '{root}': {message}")]
    Encoding { root: String, message: String },
}

/// Result type alias for Rent-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for query building
pub type QueryResult<T> = std::result::Result<T, QueryError>;

// Re-export commonly used types
pub use areas::SectionDirectory;
pub use config::Config;
pub use crawler::Scout;
pub use query::{split_sections, Query};
pub use record::Record;
