// src/page/dom.rs
// =============================================================================
// The DOM side of a loaded page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Collects markup errors instead of failing on broken HTML
//
// Those markup errors are the "benign page errors" of a run: they are kept
// as warnings on the page and never stop the check.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// An anchor element as seen by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorElement {
    /// Value of the `href` attribute, if the element has one
    pub href: Option<String>,
    /// Visible text content with whitespace collapsed
    pub text: String,
}

/// What the extractor needs from a rendered page.
pub trait PageDom {
    /// Every anchor element in document order.
    fn anchors(&self) -> Vec<AnchorElement>;

    /// URL that relative hrefs are resolved against.
    fn base_url(&self) -> &Url;
}

/// A page parsed with scraper.
pub struct RenderedPage {
    document: Html,
    base_url: Url,
    warnings: Vec<String>,
}

impl RenderedPage {
    // Parses the HTML and works out the base URL
    //
    // Parameters:
    //   html: the HTML content of the page
    //   page_url: the URL the page was actually served from (after redirects)
    //
    // A <base href="..."> element wins over the page URL, the same way a
    // browser resolves links.
    pub fn parse(html: &str, page_url: Url) -> Self {
        let document = Html::parse_document(html);

        // Selector::parse only fails on invalid CSS, and this one is constant
        let base_selector = Selector::parse("base[href]").expect("static selector is valid");
        let base_url = document
            .select(&base_selector)
            .next()
            .and_then(|base| base.value().attr("href"))
            .and_then(|href| page_url.join(href.trim()).ok())
            .unwrap_or(page_url);

        let warnings = document.errors.iter().map(|e| e.to_string()).collect();

        Self {
            document,
            base_url,
            warnings,
        }
    }

    /// Markup errors the parser recovered from.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl PageDom for RenderedPage {
    fn anchors(&self) -> Vec<AnchorElement> {
        let selector = Selector::parse("a").expect("static selector is valid");

        self.document
            .select(&selector)
            .map(|element| AnchorElement {
                href: element.value().attr("href").map(str::to_string),
                text: visible_text(element),
            })
            .collect()
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

// Joins all text nodes under the element and collapses runs of whitespace,
// so "  Click\n   here " becomes "Click here"
fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
