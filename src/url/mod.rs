//! URL handling module for Aqua-Harvest
//!
//! The catalog encodes everything the crawler needs in its URLs: category
//! listings live under `/category/<id>/<slug>`, product pages under
//! `/product/<id>/<slug>`, and pagination is a query fragment appended to a
//! listing URL. This module parses and builds those shapes.

mod identifiers;
mod normalize;

pub use identifiers::{category_id, product_id, subcategory_id};
pub use normalize::{canonical_product_url, clean_subcategory_href, listing_page_url};

use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use aqua_harvest::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://www.liveaquaria.com/").unwrap();
/// let resolved = resolve_link("/product/123/x", &base).unwrap();
/// assert_eq!(resolved, "https://www.liveaquaria.com/product/123/x");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Returns the path component of an absolute or site-relative URL
pub(crate) fn path_of(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) => url.path().to_string(),
        Err(_) => link
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
