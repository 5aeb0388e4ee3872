/// Canonical per-product URL: the link with its query string removed
///
/// # Examples
///
/// ```
/// use aqua_harvest::url::canonical_product_url;
///
/// assert_eq!(
///     canonical_product_url("/product/110/yellow-tang?pcatid=110&c=15"),
///     "/product/110/yellow-tang"
/// );
/// ```
pub fn canonical_product_url(href: &str) -> String {
    href.split('?').next().unwrap_or_default().to_string()
}

/// Cleans a discovered subcategory href
///
/// Listing links carry a trailing `&r=` referral parameter that only varies
/// the URL without changing the page; it is cut off so the subcategory URL
/// is stable between runs.
pub fn clean_subcategory_href(href: &str) -> String {
    if href.contains('?') {
        href.split("&r=").next().unwrap_or_default().to_string()
    } else {
        href.to_string()
    }
}

/// Builds the URL of one listing page of a subcategory
///
/// Page 1 is the bare subcategory URL; later pages append the catalog's
/// pagination fragment.
///
/// # Examples
///
/// ```
/// use aqua_harvest::url::listing_page_url;
///
/// assert_eq!(listing_page_url("/category/16/angelfish", 1, 24), "/category/16/angelfish");
/// assert_eq!(
///     listing_page_url("/category/16/angelfish?c=15+16", 3, 24),
///     "/category/16/angelfish?c=15+16&s=ts&start=1&page_num=3&count=24"
/// );
/// ```
pub fn listing_page_url(subcategory_url: &str, page: u32, page_size: u32) -> String {
    if page <= 1 {
        return subcategory_url.to_string();
    }

    let separator = if subcategory_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}s=ts&start=1&page_num={}&count={}",
        subcategory_url, separator, page, page_size
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_product_url_without_query() {
        assert_eq!(
            canonical_product_url("https://x.com/product/1/a"),
            "https://x.com/product/1/a"
        );
    }

    #[test]
    fn test_clean_subcategory_href() {
        assert_eq!(
            clean_subcategory_href("/category/27/angelfish?c=15+27&r=abc"),
            "/category/27/angelfish?c=15+27"
        );
        assert_eq!(
            clean_subcategory_href("/category/27/angelfish"),
            "/category/27/angelfish"
        );
    }

    #[test]
    fn test_listing_page_url_without_query() {
        assert_eq!(
            listing_page_url("/category/27/angelfish", 2, 24),
            "/category/27/angelfish?s=ts&start=1&page_num=2&count=24"
        );
    }
}
