//! Listing extractor
//!
//! Turns one result page into [`Record`]s. Listing markup is loosely
//! structured: fields go missing, the description fields come in a different
//! order depending on how many are present, and most values carry trailing
//! decoration. Extraction never fails; a field it cannot find is left empty.
//!
//! # Description repair
//!
//! The description is a `|`-separated list of up to four values. The rules
//! below are applied in order before positions are mapped to option type,
//! size, room type and floor:
//!
//! | Tokens | Repair |
//! |--------|--------|
//! | 4      | Swap positions 1 and 2 (the site lists room type before size) |
//! | < 4    | Move position 2 to the end, put the no-layout placeholder in its place |
//!
//! Each value is then cut down to its first word.

use crate::crawler::document::{first_attr, joined_text, last_text, nth_text, with_document, Markup};
use crate::record::{first_word, normalize_text, Record, NO_LAYOUT_PLACEHOLDER};

const CONTENT: &str = "#content";
const FRAGMENT: &str = ".listInfo.clearfix";
const TITLE_LINK: &str = ".pull-left.infoContent > h3 > a[href]";
const DETAIL_LINK: &str = ".pull-left.infoContent > h3 > a";
const ID_LINK: &str = ".pull-left.infoContent > span > a";
const INFO_CONTENT: &str = ".pull-left.infoContent";
const LIGHT_BOX: &str = ".lightBox";
const PRICE: &str = ".price";

/// Scheme prepended to the protocol-relative detail links
const LINK_SCHEME: &str = "https:";

/// Parses a result page body into records
pub fn extract_page(html: &str) -> Vec<Record> {
    with_document(html, extract)
}

/// Extracts every listing fragment under the page's content container
///
/// A page without the container yields no records.
pub fn extract(page: &dyn Markup) -> Vec<Record> {
    let mut records = Vec::new();

    for content in page.select(CONTENT) {
        for fragment in content.select(FRAGMENT) {
            records.push(extract_fragment(fragment.as_ref()));
        }
    }

    records
}

/// Extracts a single listing fragment
pub fn extract_fragment(fragment: &dyn Markup) -> Record {
    let mut record = Record {
        title: normalize_text(&joined_text(fragment, TITLE_LINK)),
        ..Record::default()
    };

    let href = first_attr(fragment, DETAIL_LINK, "href")
        .map(|href| normalize_text(&href))
        .unwrap_or_default();
    record.url = format!("{}{}", LINK_SCHEME, href);

    if let Some(id) = first_attr(fragment, ID_LINK, "data-text") {
        record.id = format!("R{}", id);
    }

    // Last info block wins if a fragment somehow carries several
    for info in fragment.select(INFO_CONTENT) {
        let info = info.as_ref();

        let description = nth_text(info, LIGHT_BOX, 0)
            .map(|text| normalize_text(&text))
            .unwrap_or_default();
        let [option_type, size, rent_type, floor] = parse_description(&description);
        record.option_type = option_type;
        record.size = size;
        record.rent_type = rent_type;
        record.floor = floor;

        record.address = nth_text(info, LIGHT_BOX, 1)
            .map(|text| normalize_text(&text))
            .unwrap_or_default();

        record.post_by = poster(info);
    }

    if let Some(price) = last_text(fragment, PRICE) {
        record.price = normalize_text(&price);
    }

    record
}

/// Splits and repairs a normalized description into
/// `[option_type, size, rent_type, floor]`
pub fn parse_description(description: &str) -> [String; 4] {
    let mut tokens: Vec<String> = description.split('|').map(str::to_string).collect();

    if tokens.len() == 4 {
        tokens.swap(1, 2);
    }

    if tokens.len() < 4 {
        tokens.resize(3, String::new());
        let room_type = std::mem::replace(&mut tokens[2], NO_LAYOUT_PLACEHOLDER.to_string());
        tokens.push(room_type);
    }

    std::array::from_fn(|i| first_word(&tokens[i]))
}

// Third paragraph, first emphasis
fn poster(info: &dyn Markup) -> String {
    let paragraphs = info.select("p");
    let Some(paragraph) = paragraphs.get(2) else {
        return String::new();
    };

    nth_text(paragraph.as_ref(), "em", 0)
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}
