// src/crawl/html.rs
// =============================================================================
// Pulls the raw href values out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, Mozilla's HTML parser)
// - Never fails on bad markup; broken pages just produce fewer elements
// - Supports CSS selectors for finding elements
//
// No resolving or filtering happens here. The crawler decides which hrefs are
// worth following (see domain::extract_origin).
// =============================================================================

use std::sync::OnceLock;

use scraper::{Html, Selector};

// Matches every <a> that carries an href attribute.
// The selector is a constant, so parsing it cannot fail at runtime.
fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("constant selector"))
}

// Returns the href of every anchor element, in document order
//
// Example:
//   html   = "<a href='https://a.com/x'>A</a><a href='/docs'>Docs</a>"
//   result = ["https://a.com/x", "/docs"]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(anchor_selector())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
