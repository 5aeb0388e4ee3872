//! Shared fixtures: configuration, catalog pages and a fake translator

use aqua_harvest::config::{parse_config, Config};
use aqua_harvest::crawler::Coordinator;
use aqua_harvest::translate::TranslationBackend;
use aqua_harvest::HarvestError;
use async_trait::async_trait;
use std::path::Path;

pub const CATEGORY_PATH: &str = "/category/15/marine-fish";
pub const SUBCATEGORY_PATH: &str = "/category/16/angelfish";

/// Prefixes every text so translated fields are recognizable
pub struct EchoBackend;

#[async_trait]
impl TranslationBackend for EchoBackend {
    async fn translate(&self, text: &str) -> Result<String, HarvestError> {
        Ok(format!("TR: {}", text))
    }
}

/// Creates a test configuration with no politeness delays
pub fn create_test_config(base_url: &str, dir: &Path) -> Config {
    let mut config = parse_config(&format!(
        r#"
[crawler]
max-retries = 3
retry-backoff-ms = 1
max-listing-pages = 10

[rate-limit]
product-delay-min-ms = 0
product-delay-max-ms = 0
translation-delay-min-ms = 0
translation-delay-max-ms = 0

[translation]
retry-delay-ms = 1

[site]
base-url = "{}"

[output]
data-dir = "./data"

[[category]]
name = "Marine Fish"
name-tr = "Deniz Balıkları"
slug = "marine-fish"
url = "{}"
"#,
        base_url, CATEGORY_PATH
    ))
    .expect("valid test config");

    config.output.data_dir = dir.join("data").to_string_lossy().into_owned();
    config.output.report_path = dir.join("report.md").to_string_lossy().into_owned();
    config.output.sqlite_path = dir.join("species.db").to_string_lossy().into_owned();
    config.postprocess.image_dir = dir.join("data/images").to_string_lossy().into_owned();
    config.postprocess.publish_dir = dir.join("public").to_string_lossy().into_owned();
    config
}

pub fn coordinator(config: Config) -> Coordinator {
    Coordinator::with_backend(config, Box::new(EchoBackend)).expect("Failed to create coordinator")
}

/// A category page linking to the given `(href, text)` pairs
pub fn category_page(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, text)| format!(r#"<li><a href="{}">{}</a></li>"#, href, text))
        .collect();
    format!(
        r#"<html><head><title>Marine Fish</title></head><body><ul>{}</ul></body></html>"#,
        anchors
    )
}

/// A listing page with product tiles and an optional link to `next_page`
pub fn listing_page(product_paths: &[&str], next_page: Option<u32>) -> String {
    let tiles: String = product_paths
        .iter()
        .map(|p| format!(r#"<div class="tile"><a href="{}?pcatid=1&c=15+16">x</a></div>"#, p))
        .collect();
    let pager = next_page
        .map(|n| {
            format!(
                r#"<a href="{}?c=15+16&s=ts&start=1&page_num={}&count=24">{}</a>"#,
                SUBCATEGORY_PATH, n, n
            )
        })
        .unwrap_or_default();
    format!("<html><body>{}{}</body></html>", tiles, pager)
}

/// A species page in the catalog's product layout
pub fn product_page(id: &str, name: &str, size: &str) -> String {
    format!(
        r#"<html>
<head><title>{name} : Saltwater Aquarium Fish</title></head>
<body>
  <img src="/images/categories/product/p-{id}.jpg">
  <div class="quick_stat_entry">
    <span class="quick_stat_label">Care Level</span><span class="quick_stat_value">Moderate</span>
  </div>
  <div class="quick_stat_entry">
    <span class="quick_stat_label">Temperament</span><span class="quick_stat_value">Semi-aggressive</span>
  </div>
  <div class="quick_stat_entry">
    <span class="quick_stat_label">Water Conditions</span>
    <span class="quick_stat_value">72-78&deg; F, dKH 8-12, pH 8.1-8.4, sg 1.020-1.025</span>
  </div>
  <div class="quick_stat_entry">
    <span class="quick_stat_label">Max. Size</span><span class="quick_stat_value">{size}</span>
  </div>
  <div class="quick_stat_entry">
    <span class="quick_stat_label">Minimum Tank Size</span><span class="quick_stat_value">70 gallons</span>
  </div>
  <div class="overview-content">The {name} is a colorful reef visitor. Approximate Purchase Size: Small: 1-1/2"</div>
</body>
</html>"#,
        id = id,
        name = name,
        size = size
    )
}
