use crate::url::path_of;

/// Extracts the category identifier from a listing URL
///
/// The identifier is the all-digit path segment that follows `category` and
/// is itself followed by another segment, e.g. `15` in
/// `/category/15/marine-fish`.
///
/// # Examples
///
/// ```
/// use aqua_harvest::url::category_id;
///
/// assert_eq!(category_id("/category/15/marine-fish").as_deref(), Some("15"));
/// assert_eq!(category_id("/product/15/tang"), None);
/// ```
pub fn category_id(link: &str) -> Option<String> {
    let path = path_of(link);
    let segments: Vec<&str> = path.split('/').collect();

    segments.windows(3).find_map(|window| match window {
        ["category", id, _] if is_numeric(id) => Some(id.to_string()),
        _ => None,
    })
}

/// Extracts the subcategory's own identifier from a discovered link
///
/// Subcategory pages share the `/category/<id>/` shape with their parent;
/// the difference is only which number appears in the path.
pub fn subcategory_id(link: &str) -> Option<String> {
    category_id(link)
}

/// Extracts the record identifier from a product URL
///
/// The identifier is the run of digits that starts the path segment after
/// `product`. A URL without one is not a species page.
///
/// # Examples
///
/// ```
/// use aqua_harvest::url::product_id;
///
/// assert_eq!(product_id("https://www.liveaquaria.com/product/1203/clarkii-clownfish").as_deref(), Some("1203"));
/// assert_eq!(product_id("/product/prod_display.cfm"), None);
/// ```
pub fn product_id(link: &str) -> Option<String> {
    let path = path_of(link);
    let mut segments = path.split('/');

    while let Some(segment) = segments.next() {
        if segment != "product" {
            continue;
        }
        let digits: String = segments
            .next()
            .unwrap_or_default()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if !digits.is_empty() {
            return Some(digits);
        }
    }

    None
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
}
