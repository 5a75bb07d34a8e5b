// src/checker/extract.rs
// =============================================================================
// This module turns the anchors of a page into links we can check.
//
// Two steps:
// 1. link_candidates: lazily walk the anchors, dropping the ones with no
//    href and the ones whose href starts with an excluded scheme
//    (javascript:, mailto:, tel: by default)
// 2. normalize: turn each candidate into an absolute URL, resolving
//    relative hrefs against the page's base URL
//
// A malformed href is not fatal. extract_links logs it, records it as an
// InvalidLink and carries on with the rest of the page.
// =============================================================================

use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::CheckConfig;
use crate::error::InvalidLink;
use crate::page::PageDom;

/// An anchor that survived filtering but has not been resolved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub raw_href: String,
    pub text: String,
}

/// A link ready for validation.
///
/// `absolute_url` always has a scheme and a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedLink {
    pub absolute_url: Url,
    pub text: String,
}

/// Everything extraction produced for one page.
#[derive(Debug, Default)]
pub struct Extraction {
    pub links: Vec<NormalizedLink>,
    pub invalid: Vec<InvalidLink>,
}

// Lazily yields the anchors worth checking
//
// Skipped:
// - anchors without an href, or with an empty one
// - hrefs starting with an excluded scheme (case-sensitive prefix match)
pub fn link_candidates<'a, D: PageDom>(
    dom: &D,
    config: &'a CheckConfig,
) -> impl Iterator<Item = LinkCandidate> + 'a {
    dom.anchors().into_iter().filter_map(move |anchor| {
        let href = anchor.href?;
        let href = href.trim();

        if href.is_empty() {
            return None;
        }
        if config.is_excluded(href) {
            debug!("Skipping non-navigable link: {}", href);
            return None;
        }

        Some(LinkCandidate {
            raw_href: href.to_string(),
            text: anchor.text,
        })
    })
}

// Resolves a candidate to an absolute URL
//
// Examples (base = "http://example.com/docs/"):
//   "/foo"               -> "http://example.com/foo"
//   "guide.html"         -> "http://example.com/docs/guide.html"
//   "https://other.com"  -> "https://other.com/"
//   "http://[::1"        -> InvalidLink
pub fn normalize(candidate: LinkCandidate, base: &Url) -> Result<NormalizedLink, InvalidLink> {
    let parsed = if candidate.raw_href.starts_with("http") {
        Url::parse(&candidate.raw_href)
    } else {
        base.join(&candidate.raw_href)
    };

    let invalid = |reason: String| InvalidLink {
        href: candidate.raw_href.clone(),
        text: candidate.text.clone(),
        reason,
    };

    let absolute_url = parsed.map_err(|e| invalid(e.to_string()))?;
    if absolute_url.host_str().is_none() {
        return Err(invalid("resolved URL has no host".to_string()));
    }

    Ok(NormalizedLink {
        absolute_url,
        text: candidate.text,
    })
}

/// Extracts and normalizes every checkable link on the page.
pub fn extract_links<D: PageDom>(dom: &D, config: &CheckConfig) -> Extraction {
    let base = dom.base_url().clone();
    let mut extraction = Extraction::default();

    for candidate in link_candidates(dom, config) {
        match normalize(candidate, &base) {
            Ok(link) => extraction.links.push(link),
            Err(invalid) => {
                warn!("Skipping {}", invalid);
                extraction.invalid.push(invalid);
            }
        }
    }

    extraction
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why return impl Iterator from link_candidates?
//    - Nothing is filtered until someone iterates
//    - The caller decides whether to collect, count or stop early
//
// 2. What does `anchor.href?` do inside filter_map?
//    - The closure returns Option, so ? on a None returns None early
//    - That anchor is simply skipped
//
// 3. Url::join vs Url::parse:
//    - parse() only accepts absolute URLs ("https://...")
//    - join() resolves a relative reference like a browser does:
//      "http://example.com/docs/" + "../about" = "http://example.com/about"
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::dom::AnchorElement;

    struct FakeDom {
        base: Url,
        anchors: Vec<AnchorElement>,
    }

    impl PageDom for FakeDom {
        fn anchors(&self) -> Vec<AnchorElement> {
            self.anchors.clone()
        }

        fn base_url(&self) -> &Url {
            &self.base
        }
    }

    fn dom(base: &str, hrefs: &[Option<&str>]) -> FakeDom {
        FakeDom {
            base: Url::parse(base).unwrap(),
            anchors: hrefs
                .iter()
                .enumerate()
                .map(|(i, href)| AnchorElement {
                    href: href.map(str::to_string),
                    text: format!("link {}", i),
                })
                .collect(),
        }
    }

    fn candidate(href: &str) -> LinkCandidate {
        LinkCandidate {
            raw_href: href.to_string(),
            text: String::new(),
        }
    }

    #[test]
    fn test_excluded_schemes_never_normalized() {
        let dom = dom(
            "http://example.com/",
            &[
                Some("javascript:void(0)"),
                Some("mailto:a@b.com"),
                Some("tel:+15551234"),
                Some("/ok"),
            ],
        );
        let extraction = extract_links(&dom, &CheckConfig::default());
        assert_eq!(extraction.links.len(), 1);
        assert_eq!(extraction.links[0].absolute_url.as_str(), "http://example.com/ok");
        assert!(extraction.invalid.is_empty());
    }

    #[test]
    fn test_missing_and_empty_href_skipped() {
        let dom = dom("http://example.com/", &[None, Some(""), Some("   ")]);
        assert_eq!(link_candidates(&dom, &CheckConfig::default()).count(), 0);
    }

    #[test]
    fn test_resolve_relative_link() {
        let base = Url::parse("http://example.com/").unwrap();
        let link = normalize(candidate("/foo"), &base).unwrap();
        assert_eq!(link.absolute_url.as_str(), "http://example.com/foo");
    }

    #[test]
    fn test_resolve_against_nested_base() {
        let base = Url::parse("http://example.com/docs/index.html").unwrap();
        let link = normalize(candidate("guide.html"), &base).unwrap();
        assert_eq!(link.absolute_url.as_str(), "http://example.com/docs/guide.html");

        let link = normalize(candidate("../about"), &base).unwrap();
        assert_eq!(link.absolute_url.as_str(), "http://example.com/about");
    }

    #[test]
    fn test_absolute_link_kept() {
        let base = Url::parse("http://example.com/").unwrap();
        let link = normalize(candidate("http://x/404"), &base).unwrap();
        assert_eq!(link.absolute_url.as_str(), "http://x/404");
    }

    #[test]
    fn test_malformed_href_is_invalid_link() {
        let base = Url::parse("http://example.com/").unwrap();
        let err = normalize(candidate("http://[::1"), &base).unwrap_err();
        assert_eq!(err.href, "http://[::1");
    }

    #[test]
    fn test_hostless_result_is_invalid_link() {
        let base = Url::parse("http://example.com/").unwrap();
        let err = normalize(candidate("data:text/plain,hi"), &base).unwrap_err();
        assert_eq!(err.reason, "resolved URL has no host");
    }

    #[test]
    fn test_invalid_link_recorded_not_fatal() {
        let dom = dom("http://example.com/", &[Some("http://[::1"), Some("/fine")]);
        let extraction = extract_links(&dom, &CheckConfig::default());
        assert_eq!(extraction.links.len(), 1);
        assert_eq!(extraction.invalid.len(), 1);
    }

    #[test]
    fn test_custom_excluded_schemes() {
        let config = CheckConfig {
            excluded_schemes: vec!["ftp:".to_string()],
            ..CheckConfig::default()
        };
        let dom = dom("http://example.com/", &[Some("ftp://files.example.com"), Some("/a")]);
        let candidates: Vec<_> = link_candidates(&dom, &config).collect();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].raw_href, "/a");
    }
}
