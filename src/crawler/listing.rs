//! Listing extractor: front page rows to story stubs
//!
//! The listing marks each story as a `tr.athing` row carrying a stable `id`
//! attribute and a headline anchor. Extraction is a single pass in document
//! order; document order is the sole ordering, with no secondary key.

use scraper::{Html, Selector};
use url::Url;

/// Minimal identifying record for one listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryStub {
    /// The site's stable story identifier (the row's `id` attribute)
    pub id: String,

    /// Headline text
    pub title: String,

    /// Absolute URL of the story itself
    pub permalink: Url,
}

/// Extracts up to `limit` story stubs from the listing page.
///
/// Scanning stops after `limit` rows even if more exist. Rows missing the id
/// attribute or the headline anchor are skipped rather than treated as an
/// error, so a page with no recognizable rows simply yields no stubs.
pub fn extract_top(html: &str, base_url: &Url, limit: usize) -> Vec<StoryStub> {
    let document = Html::parse_document(html);
    let (Ok(row_selector), Ok(link_selector)) =
        (Selector::parse("tr.athing"), Selector::parse("a.storylink"))
    else {
        return Vec::new();
    };

    let mut stubs = Vec::new();
    for row in document.select(&row_selector).take(limit) {
        let Some(id) = row.value().attr("id") else {
            continue;
        };
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Ok(permalink) = base_url.join(href) else {
            tracing::debug!("Skipping story {} with unresolvable href {}", id, href);
            continue;
        };

        let title = link.text().collect::<String>().trim().to_string();
        stubs.push(StoryStub {
            id: id.to_string(),
            title,
            permalink,
        });
    }
    stubs
}
