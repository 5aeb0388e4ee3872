use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for Aqua-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "rate-limit", default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub postprocess: PostprocessConfig,
    #[serde(rename = "category", default)]
    pub categories: Vec<CategoryConfig>,
}

/// Fetch and pagination behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Attempts per URL before it is reported unreachable
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Backoff unit between attempts; attempt `n` waits `n * backoff`
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,

    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Hard ceiling on listing pages walked per subcategory
    #[serde(rename = "max-listing-pages")]
    pub max_listing_pages: u32,

    /// Products per listing page requested through the pagination query
    #[serde(rename = "page-size")]
    pub page_size: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_backoff_ms: 3000,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_listing_pages: 30,
            page_size: 24,
        }
    }
}

/// Politeness delays, in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Coarse delay between product fetches and listing pages
    #[serde(rename = "product-delay-min-ms")]
    pub product_delay_min_ms: u64,

    #[serde(rename = "product-delay-max-ms")]
    pub product_delay_max_ms: u64,

    /// Fine delay after each translation call
    #[serde(rename = "translation-delay-min-ms")]
    pub translation_delay_min_ms: u64,

    #[serde(rename = "translation-delay-max-ms")]
    pub translation_delay_max_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            product_delay_min_ms: 1000,
            product_delay_max_ms: 2500,
            translation_delay_min_ms: 300,
            translation_delay_max_ms: 800,
        }
    }
}

/// Request identity presented to the catalog
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub referer: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            referer: "https://www.liveaquaria.com/".to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// The catalog being harvested
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin that relative catalog links resolve against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Substring identifying the catalog's media host in image sources
    #[serde(rename = "media-host", default = "default_media_host")]
    pub media_host: String,
}

fn default_media_host() -> String {
    "liveaquaria".to_string()
}

/// External machine translation endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,

    #[serde(rename = "source-language")]
    pub source_language: String,

    #[serde(rename = "target-language")]
    pub target_language: String,

    /// Protected text beyond this many characters is not sent
    #[serde(rename = "max-chars")]
    pub max_chars: usize,

    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            source_language: "en".to_string(),
            target_language: "tr".to_string(),
            max_chars: 4000,
            max_retries: 3,
            retry_delay_ms: 2000,
            timeout_secs: 15,
        }
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one `<slug>.json` collection per category
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// File name of the category index, written inside `data-dir`
    #[serde(rename = "index-file", default = "default_index_file")]
    pub index_file: String,

    /// Path to the markdown run report
    #[serde(rename = "report-path", default = "default_report_path")]
    pub report_path: String,

    /// Path to the SQLite export database
    #[serde(rename = "sqlite-path", default = "default_sqlite_path")]
    pub sqlite_path: String,
}

fn default_index_file() -> String {
    "categories.json".to_string()
}

fn default_report_path() -> String {
    "./harvest-report.md".to_string()
}

fn default_sqlite_path() -> String {
    "./species.db".to_string()
}

impl OutputConfig {
    pub fn data_dir(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.data_dir().join(&self.index_file)
    }
}

/// Settings for the stages that run over an already harvested dataset
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    #[serde(rename = "image-dir")]
    pub image_dir: String,

    /// Downloads smaller than this are treated as failures
    #[serde(rename = "min-image-bytes")]
    pub min_image_bytes: u64,

    #[serde(rename = "publish-dir")]
    pub publish_dir: String,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            image_dir: "./data/images".to_string(),
            min_image_bytes: 1000,
            publish_dir: "./public".to_string(),
        }
    }
}

/// A top-level catalog category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Display name in the source language
    pub name: String,

    /// Display name in the target language
    #[serde(rename = "name-tr")]
    pub name_tr: String,

    /// URL-safe slug, also the collection file stem
    pub slug: String,

    /// Listing URL, absolute or relative to the site base URL
    pub url: String,
}

impl CategoryConfig {
    /// The numeric category identifier carried in the listing URL
    pub fn category_id(&self) -> Option<String> {
        crate::url::category_id(&self.url)
    }

    /// File name of this category's persisted collection
    pub fn collection_file(&self) -> String {
        format!("{}.json", self.slug)
    }
}

impl RateLimitConfig {
    pub fn product_delay(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.product_delay_min_ms),
            Duration::from_millis(self.product_delay_max_ms),
        )
    }

    pub fn translation_delay(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.translation_delay_min_ms),
            Duration::from_millis(self.translation_delay_max_ms),
        )
    }
}
