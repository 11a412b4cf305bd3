//! Query string encoding
//!
//! Keys are written in sorted order so the same query always yields the same
//! URL. Filters that are unset are left out, except the pagination, kind,
//! ordering and region keys which the listing site expects to always be present.

use super::Query;
use crate::{QueryError, QueryResult};
use url::Url;

const FIRST_ROW: &str = "firstRow";

impl Query {
    /// Builds the request URL for this query
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The endpoint with the encoded query string
    /// * `Err(QueryError::Encoding)` - The root endpoint is not an absolute URL
    ///
    /// # Example
    ///
    /// ```
    /// use rent_scout::query::Query;
    ///
    /// let mut query = Query::new("https://rent.591.com.tw/");
    /// query.region = 8;
    /// query.section = "100,102".to_string();
    ///
    /// assert_eq!(
    ///     query.url().unwrap().as_str(),
    ///     "https://rent.591.com.tw/?firstRow=0&kind=0&order=&orderType=&region=8&section=100%2C102"
    /// );
    /// ```
    pub fn url(&self) -> QueryResult<Url> {
        let mut url = Url::parse(&self.root_url).map_err(|e| QueryError::Encoding {
            root: self.root_url.clone(),
            message: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(QueryError::Encoding {
                root: self.root_url.clone(),
                message: "endpoint cannot carry a query string".to_string(),
            });
        }

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            pairs.append_pair(FIRST_ROW, &self.first_row.to_string());
            pairs.append_pair("kind", &self.kind.to_string());
            pairs.append_pair("order", &self.order);
            pairs.append_pair("orderType", &self.order_type);
            pairs.append_pair("region", &self.region.to_string());
            if !self.rent_price.is_empty() {
                pairs.append_pair("rentprice", &self.rent_price);
            }
            if !self.role.is_empty() {
                pairs.append_pair("role", &self.role);
            }
            if !self.section.is_empty() {
                pairs.append_pair("section", &self.section);
            }
            if self.sex != 0 {
                pairs.append_pair("sex", &self.sex.to_string());
            }
        }

        Ok(url)
    }
}

/// Returns a copy of `url` with its pagination offset set to `first_row`
///
/// An existing offset is replaced in place so the parameter never appears
/// twice; otherwise it is appended.
pub fn set_first_row(url: &Url, first_row: usize) -> Url {
    let offset = first_row.to_string();
    let mut replaced = false;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(key, value)| {
            if key == FIRST_ROW {
                if replaced {
                    return None;
                }
                replaced = true;
                return Some((key.into_owned(), offset.clone()));
            }
            Some((key.into_owned(), value.into_owned()))
        })
        .collect();

    let mut paged = url.clone();
    {
        let mut serializer = paged.query_pairs_mut();
        serializer.clear();
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        if !replaced {
            serializer.append_pair(FIRST_ROW, &offset);
        }
    }
    paged
}

/// Request parameters recovered from an encoded listing URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pub region: Option<u32>,
    pub section: Option<String>,
    pub first_row: usize,
}

impl RequestParams {
    /// Parses the region, section and offset back out of a request URL
    ///
    /// Unparseable numbers are treated as absent. A missing offset is 0.
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "region" => params.region = value.parse().ok(),
                "section" => params.section = Some(value.into_owned()),
                FIRST_ROW => params.first_row = value.parse().unwrap_or(0),
                _ => {}
            }
        }

        params
    }
}
