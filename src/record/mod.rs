//! Listing records
//!
//! A [`Record`] is one rental listing. List scraping fills in everything it can
//! see on a result page; phone, community and layout only come from the detail
//! page and are filled in later, in place.

mod normalize;

pub use normalize::{first_word, normalize_text, spacing_text};

use serde::{Deserialize, Serialize};

/// Placeholder used when a listing has no layout description
pub const NO_LAYOUT_PLACEHOLDER: &str = "沒有格局說明";

/// Sentinel stored when a detail page has no phone number
pub const PHONE_UNAVAILABLE: &str = "n/a";

/// One rental listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Site identifier, prefixed with `R`
    pub id: String,

    pub title: String,

    /// Absolute URL of the detail page
    pub url: String,

    pub address: String,

    /// Community (building complex) name, detail page only
    pub community: String,

    /// Unit category (whole floor, studio, ...)
    pub option_type: String,

    /// Floor area
    pub size: String,

    /// Room type as listed in the description
    pub rent_type: String,

    pub floor: String,

    /// Price with its original formatting
    pub price: String,

    /// Room layout, detail page only
    pub layout: String,

    /// Poster name
    pub post_by: String,

    /// Contact phone, detail page only
    pub phone: String,

    /// Section code the record was found under (or its name once replaced)
    pub section: String,
}

/// Stamps every record with the section it was crawled under
pub fn stamp_section(records: &mut [Record], section: &str) {
    for record in records.iter_mut() {
        record.section = section.to_string();
    }
}
