//! Product page extraction
//!
//! Each field has a primary selector tied to the catalog's product layout
//! and, where the layout is known to vary, an ordered list of fallbacks.
//! A field that no strategy finds stays empty; only a missing record
//! identifier rejects the page.

use crate::config::Config;
use crate::crawler::{Fetcher, RateGovernor};
use crate::extract::attributes::apply_quick_stat;
use crate::extract::text::{char_len, element_text, truncate_chars};
use crate::extract::SpeciesRecord;
use crate::translate::{translate_attributes, NameProtectingTranslator};
use crate::url::{product_id, resolve_link};
use crate::HarvestError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const MAX_DESCRIPTION_CHARS: usize = 3000;
const MIN_FALLBACK_DESCRIPTION_CHARS: usize = 100;
const MAX_FEEDING_CHARS: usize = 1500;
const MIN_FEEDING_CHARS: usize = 20;
const MAX_SCIENTIFIC_NAME_CHARS: usize = 50;

const PRODUCT_IMAGE_DIRS: &[&str] = &["/images/categories/product/", "/images/product/"];
const FALLBACK_DESCRIPTION_SELECTOR: &str = ".product_content_bottom_details_mobile, .description";

static BINOMIAL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+ [a-z]+").expect("valid binomial pattern"));

/// Where a product page came from
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Product URL as listed (site-relative or absolute)
    pub url: &'a str,
    /// Slug of the owning category
    pub category_slug: &'a str,
    /// Label of the subcategory the product was listed under
    pub subcategory: &'a str,
    /// Origin that relative links resolve against
    pub base_url: &'a Url,
    /// Marker identifying the origin's media host in image sources
    pub media_host: &'a str,
}

/// Extracts a species record from a parsed product page
///
/// Returns `None` when the URL carries no product identifier. The returned
/// record may still lack a name; callers check
/// [`SpeciesRecord::is_valid`] before accepting it. Categorical attributes
/// are translated through the lookup tables; free text is left for the
/// translator.
pub fn parse_species_page(document: &Html, context: &PageContext<'_>) -> Option<SpeciesRecord> {
    let id = product_id(context.url)?;

    let mut record = SpeciesRecord {
        id,
        url: resolve_link(context.url, context.base_url)
            .unwrap_or_else(|| context.url.to_string()),
        category: context.category_slug.to_string(),
        subcategory: context.subcategory.to_string(),
        ..SpeciesRecord::default()
    };

    record.name = extract_name(document);
    // species names are proper nouns
    record.name_tr = record.name.clone();

    extract_quick_stats(document, &mut record);

    if record.scientific_name.is_empty() {
        record.scientific_name = extract_italic_binomial(document).unwrap_or_default();
    }

    record.image_url = extract_image_url(document, context).unwrap_or_default();
    record.description = extract_description(document).unwrap_or_default();
    record.feeding = extract_feeding(document).unwrap_or_default();

    translate_attributes(&mut record);

    Some(record)
}

/// Name from the document title, falling back to the last breadcrumb
fn extract_name(document: &Html) -> String {
    let from_title = first_text(document, "title")
        .map(|title| {
            let before_colon = title.split(':').next().unwrap_or_default();
            before_colon
                .split('|')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    if !from_title.is_empty() {
        return from_title;
    }

    first_text(document, "span.breadcrumb")
        .and_then(|trail| {
            trail
                .split('>')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .last()
                .map(str::to_string)
        })
        .unwrap_or_default()
}

fn extract_quick_stats(document: &Html, record: &mut SpeciesRecord) {
    let (Ok(entry_selector), Ok(label_selector), Ok(value_selector)) = (
        Selector::parse(".quick_stat_entry"),
        Selector::parse(".quick_stat_label"),
        Selector::parse(".quick_stat_value"),
    ) else {
        return;
    };

    for entry in document.select(&entry_selector) {
        let label = entry.select(&label_selector).next();
        let value = entry.select(&value_selector).next();
        if let (Some(label), Some(value)) = (label, value) {
            apply_quick_stat(record, &element_text(&label), &element_text(&value));
        }
    }
}

/// First emphasized text shaped like a binomial name
fn extract_italic_binomial(document: &Html) -> Option<String> {
    let selector = Selector::parse("em, i").ok()?;

    document
        .select(&selector)
        .map(|element| element_text(&element))
        .find(|text| BINOMIAL_NAME.is_match(text) && char_len(text) < MAX_SCIENTIFIC_NAME_CHARS)
}

fn extract_image_url(document: &Html, context: &PageContext<'_>) -> Option<String> {
    let selector = Selector::parse("img[src]").ok()?;

    let product_image = document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| PRODUCT_IMAGE_DIRS.iter().any(|dir| src.contains(dir)));

    if let Some(src) = product_image {
        return Some(resolve_link(src, context.base_url).unwrap_or_else(|| src.to_string()));
    }

    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .find(|src| !src.is_empty() && src.contains(context.media_host))
        .map(str::to_string)
}

fn extract_description(document: &Html) -> Option<String> {
    let overview = first_text(document, ".overview-content")
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS).to_string())
        .filter(|text| !text.is_empty());

    if overview.is_some() {
        return overview;
    }

    let selector = Selector::parse(FALLBACK_DESCRIPTION_SELECTOR).ok()?;
    document
        .select(&selector)
        .map(|element| element_text(&element))
        .find(|text| char_len(text) > MIN_FALLBACK_DESCRIPTION_CHARS)
        .map(|text| truncate_chars(&text, MAX_DESCRIPTION_CHARS).to_string())
}

/// Paragraph following the first feeding/nutrition heading
fn extract_feeding(document: &Html) -> Option<String> {
    let selector = Selector::parse("h3, h4, strong").ok()?;

    for heading in document.select(&selector) {
        let heading_text = element_text(&heading).to_lowercase();
        if !heading_text.contains("feeding") && !heading_text.contains("nutrition") {
            continue;
        }

        let sibling = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|element| matches!(element.value().name(), "p" | "div"));

        if let Some(sibling) = sibling {
            let text = element_text(&sibling);
            if char_len(&text) > MIN_FEEDING_CHARS {
                return Some(truncate_chars(&text, MAX_FEEDING_CHARS).to_string());
            }
        }
    }

    None
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element_text(&element))
}

/// Fetches product pages and produces translated records
pub struct ProductExtractor {
    base_url: Url,
    media_host: String,
    fine: RateGovernor,
}

impl ProductExtractor {
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        Ok(Self {
            base_url: Url::parse(&config.site.base_url)?,
            media_host: config.site.media_host.clone(),
            fine: RateGovernor::fine(&config.rate_limit),
        })
    }

    /// Fetches, parses and translates one product
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - A valid record with translated free text
    /// * `Ok(None)` - The page is not a species page or lacks a name
    /// * `Err(_)` - The page could not be fetched
    pub async fn extract(
        &self,
        fetcher: &Fetcher,
        translator: &mut NameProtectingTranslator,
        url: &str,
        category_slug: &str,
        subcategory: &str,
    ) -> Result<Option<SpeciesRecord>, HarvestError> {
        let page = fetcher.fetch(url).await?;

        let context = PageContext {
            url,
            category_slug,
            subcategory,
            base_url: &self.base_url,
            media_host: &self.media_host,
        };
        let parsed = {
            let document = page.document();
            parse_species_page(&document, &context)
        };

        let mut record = match parsed {
            Some(record) if record.is_valid() => record,
            _ => return Ok(None),
        };

        let name = record.name.clone();
        let extra_names = [name.as_str()];

        if !record.description.is_empty() {
            record.description_tr = translator.translate(&record.description, &extra_names).await;
            self.fine.wait().await;
        }

        if !record.feeding.is_empty() {
            record.feeding_tr = translator.translate(&record.feeding, &extra_names).await;
            self.fine.wait().await;
        }

        Ok(Some(record))
    }
}
