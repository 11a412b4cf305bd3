//! Document query capability
//!
//! Extraction code only needs three things from markup: find nodes by CSS
//! selector, read a node's text, and read an attribute. [`Markup`] captures
//! exactly that, so extractors run against a `scraper` tree in production and
//! against hand-built trees in tests.

use scraper::{ElementRef, Html, Selector};

/// A node that can be queried by CSS selector
pub trait Markup {
    /// Returns every descendant matching `selector`, in document order
    ///
    /// An invalid selector matches nothing.
    fn select(&self, selector: &str) -> Vec<Box<dyn Markup + '_>>;

    /// Returns the concatenated text of this node and its descendants
    fn text(&self) -> String;

    /// Returns the value of attribute `name`, if present
    fn attr(&self, name: &str) -> Option<String>;
}

impl<'a> Markup for ElementRef<'a> {
    fn select(&self, selector: &str) -> Vec<Box<dyn Markup + '_>> {
        let selector = match Selector::parse(selector) {
            Ok(s) => s,
            Err(e) => {
                tracing::trace!("Invalid selector {:?}: {:?}", selector, e);
                return Vec::new();
            }
        };

        ElementRef::select(self, &selector)
            .map(|element| Box::new(element) as Box<dyn Markup + '_>)
            .collect()
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }
}

/// Parses `html` and runs `f` against its root element
///
/// The parsed tree never leaves this call, so callers can hold the result
/// across `.await` points.
pub fn with_document<T>(html: &str, f: impl FnOnce(&dyn Markup) -> T) -> T {
    let document = Html::parse_document(html);
    let root = document.root_element();
    f(&root)
}

/// Text of every match of `selector`, concatenated
pub fn joined_text(node: &dyn Markup, selector: &str) -> String {
    node.select(selector).iter().map(|n| n.text()).collect()
}

/// Text of the `n`th match of `selector`
pub fn nth_text(node: &dyn Markup, selector: &str, n: usize) -> Option<String> {
    node.select(selector).get(n).map(|n| n.text())
}

/// Text of the last match of `selector`
pub fn last_text(node: &dyn Markup, selector: &str) -> Option<String> {
    node.select(selector).last().map(|n| n.text())
}

/// Attribute `name` of the first match of `selector`
pub fn first_attr(node: &dyn Markup, selector: &str, name: &str) -> Option<String> {
    node.select(selector).first().and_then(|n| n.attr(name))
}
