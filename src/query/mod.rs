//! Search query model
//!
//! A [`Query`] holds the search parameters for one listing search. A query may
//! name several section codes at once; [`split_sections`] turns it into one
//! single-section partition per code, which the crawler then handles one at a
//! time.

mod builder;

pub use builder::{set_first_row, RequestParams};

use serde::Deserialize;

/// Default listing endpoint
pub const DEFAULT_ROOT_URL: &str = "https://rent.591.com.tw/";

/// Search parameters for one listing search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Query {
    /// Listing endpoint the query string is attached to
    pub root_url: String,

    /// Region code, also sent as the region cookie
    pub region: u32,

    /// Comma-joined section codes (e.g. "98,99,100")
    pub section: String,

    /// Listing kind (0 = any)
    pub kind: u32,

    /// Sort field
    pub order: String,

    /// Sort direction ("asc" / "desc")
    pub order_type: String,

    /// Rent price range (e.g. "0,100000")
    pub rent_price: String,

    /// Poster role filter
    pub role: String,

    /// Tenant sex filter (0 = any)
    pub sex: u32,

    /// Pagination offset
    pub first_row: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
            region: 1,
            section: String::new(),
            kind: 0,
            order: String::new(),
            order_type: String::new(),
            rent_price: String::new(),
            role: String::new(),
            sex: 0,
            first_row: 0,
        }
    }
}

impl Query {
    /// Creates a query against the given endpoint with every filter unset
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            ..Self::default()
        }
    }

    /// Returns a copy of this query targeting a different section field
    pub fn with_section(&self, section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            ..self.clone()
        }
    }

    /// Returns the individual section codes in the order they were given
    pub fn section_codes(&self) -> Vec<&str> {
        self.section
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .collect()
    }
}

/// Splits a multi-section query into single-section partitions
///
/// Partition order follows the order of codes in the section field. A query
/// without any section code comes back as a single, unchanged partition.
///
/// # Example
///
/// ```
/// use rent_scout::query::{split_sections, Query};
///
/// let mut query = Query::default();
/// query.section = "98,99,100".to_string();
///
/// let sections: Vec<String> = split_sections(&query)
///     .into_iter()
///     .map(|partition| partition.section)
///     .collect();
/// assert_eq!(sections, ["98", "99", "100"]);
/// ```
pub fn split_sections(query: &Query) -> Vec<Query> {
    let codes = query.section_codes();

    if codes.is_empty() {
        return vec![query.clone()];
    }

    codes
        .into_iter()
        .map(|code| query.with_section(code))
        .collect()
}
