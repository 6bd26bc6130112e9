//! Comment-link extractor: discussion page to distinct outbound URLs
//!
//! The site marks outbound comment links with `rel="nofollow"`; internal
//! navigation lacks the marker, so it is excluded by construction.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Collects the distinct externally-linked URLs from a discussion page.
///
/// Hrefs are resolved against the base URL. Exact-URL duplicates collapse to
/// one entry (two comments linking the identical page produce one fetch),
/// and the first-occurrence document order is preserved. A page without
/// marked anchors yields an empty list, never an error.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(r#"a[rel~="nofollow"]"#) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Ok(url) = base_url.join(href) else {
            tracing::debug!("Skipping unresolvable comment href {}", href);
            continue;
        };
        if seen.insert(url.clone()) {
            links.push(url);
        }
    }
    links
}
