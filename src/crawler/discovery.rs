//! Subcategory discovery
//!
//! A category listing page links to its subcategories with URLs of the form
//! `/category/<sub-id>/<slug>?c=<parent-id>+<sub-id>`. Alongside those it
//! links to pagination, sort orders, the category itself and a number of
//! sale/collection pages that reuse the same URL shape. This module keeps
//! only the real subcategories.

use crate::config::CategoryConfig;
use crate::crawler::Fetcher;
use crate::extract::element_text;
use crate::url::{clean_subcategory_href, subcategory_id};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Link texts that mark collection or sale pages rather than species groups
///
/// Matched case-insensitively as substrings of the visible link text.
pub const SKIP_SUBCATEGORY_PATTERNS: &[&str] = &[
    "value pack",
    "sale",
    "customer favorite",
    "nano fish",
    "beginners",
    "captive-bred fish",
    "tank-raised fish",
    "africa",
    "brackish",
    "popular",
];

/// Href fragments of pagination and sort links
const PAGINATION_MARKERS: &[&str] = &["start=", "page_num=", "sar=", "s=ts"];

/// A discovered grouping page beneath a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub name: String,
    pub url: String,
}

impl Subcategory {
    /// The category itself, used when discovery finds nothing
    pub fn whole_category(category: &CategoryConfig) -> Self {
        Self {
            name: category.name.clone(),
            url: category.url.clone(),
        }
    }
}

/// Extracts the subcategory links of `category` from its listing page
///
/// Output keeps document order; the first link per subcategory id wins.
pub fn extract_subcategories(document: &Html, category: &CategoryConfig) -> Vec<Subcategory> {
    let Some(parent_id) = category.category_id() else {
        return Vec::new();
    };
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut subcategories = Vec::new();

    for link in document.select(&selector) {
        let href = link.value().attr("href").unwrap_or_default().trim();
        let text = element_text(&link);

        if text.is_empty() || href.is_empty() || !href.contains("/category/") {
            continue;
        }

        if !links_into_category(href, &parent_id) {
            continue;
        }

        if PAGINATION_MARKERS.iter().any(|marker| href.contains(marker)) {
            continue;
        }

        if href.trim_end_matches('/') == category.url.trim_end_matches('/') {
            continue;
        }

        if is_skipped_collection(&text) {
            tracing::debug!("Skipping collection page '{}'", text);
            continue;
        }

        if let Some(id) = subcategory_id(href) {
            if id == parent_id || !seen.insert(id) {
                continue;
            }
        }

        subcategories.push(Subcategory {
            name: text,
            url: clean_subcategory_href(href),
        });
    }

    subcategories
}

/// True when the link text names a sale or collection page
pub fn is_skipped_collection(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SKIP_SUBCATEGORY_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// True when the href's `c` query parameter lists the parent category id
///
/// The parameter holds the category path joined by `+` (or an encoded
/// space), e.g. `c=15+16`.
fn links_into_category(href: &str, parent_id: &str) -> bool {
    let Some((_, query)) = href.split_once('?') else {
        return false;
    };

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(key, _)| *key == "c")
        .any(|(_, value)| {
            value
                .replace("%20", " ")
                .replace("%2B", "+")
                .split(['+', ' ', ','])
                .any(|id| id == parent_id)
        })
}

/// Fetches a category page and returns its subcategories
///
/// An unreachable category page yields an empty list.
pub async fn discover_subcategories(fetcher: &Fetcher, category: &CategoryConfig) -> Vec<Subcategory> {
    let page = match fetcher.fetch(&category.url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Could not load category page for {}: {}", category.name, e);
            return Vec::new();
        }
    };

    let document = page.document();
    extract_subcategories(&document, category)
}
