//! Paginated product listing
//!
//! Walks the listing pages of one subcategory and collects canonical
//! product URLs. Pagination stops at the first of:
//! - a page that cannot be fetched
//! - a page with no product links
//! - a page that adds no URL not already seen
//! - a page without a link to the following page number
//! - the configured page ceiling

use crate::config::Config;
use crate::crawler::{Fetcher, RateGovernor};
use crate::url::{canonical_product_url, listing_page_url};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Product links that point at dry goods rather than livestock
const EXCLUDED_PRODUCT_MARKERS: &[&str] = &["aquarium-fish-supplies", ".cfm"];

/// Canonical product URLs on one listing page, in document order
pub fn extract_product_links(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href*='/product/']") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .filter(|href| href.contains("/product/"))
        .filter(|href| !EXCLUDED_PRODUCT_MARKERS.iter().any(|marker| href.contains(marker)))
        .map(canonical_product_url)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Whether the page links to listing page `next_page`
pub fn has_next_page(document: &Html, next_page: u32) -> bool {
    Selector::parse(&format!("a[href*='page_num={}']", next_page))
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false)
}

struct ListingPage {
    links: Vec<String>,
    has_next: bool,
}

/// Collects product URLs across the listing pages of a subcategory
pub struct ProductLister {
    max_pages: u32,
    page_size: u32,
    coarse: RateGovernor,
}

impl ProductLister {
    pub fn new(config: &Config) -> Self {
        Self::with_governor(config, RateGovernor::coarse(&config.rate_limit))
    }

    pub fn with_governor(config: &Config, coarse: RateGovernor) -> Self {
        Self {
            max_pages: config.crawler.max_listing_pages,
            page_size: config.crawler.page_size,
            coarse,
        }
    }

    /// Returns every distinct product URL of the subcategory
    ///
    /// Fetch failures end pagination and are not reported to the caller;
    /// whatever was gathered so far is returned.
    pub async fn list_product_urls(&self, fetcher: &Fetcher, subcategory_url: &str) -> Vec<String> {
        let mut urls = Vec::new();
        let mut seen = HashSet::new();

        for page in 1..=self.max_pages {
            let page_url = listing_page_url(subcategory_url, page, self.page_size);
            tracing::debug!("Listing page {}: {}", page, page_url);

            let fetched = match fetcher.fetch(&page_url).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!("Stopping pagination at page {}: {}", page, e);
                    break;
                }
            };

            let listing = {
                let document = fetched.document();
                ListingPage {
                    links: extract_product_links(&document),
                    has_next: has_next_page(&document, page + 1),
                }
            };

            if listing.links.is_empty() {
                break;
            }

            let mut found_new = false;
            for link in listing.links {
                if seen.insert(link.clone()) {
                    urls.push(link);
                    found_new = true;
                }
            }

            if !found_new || !listing.has_next {
                break;
            }

            if page < self.max_pages {
                self.coarse.wait().await;
            }
        }

        urls
    }
}
