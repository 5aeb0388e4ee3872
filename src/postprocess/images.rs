//! Image retriever
//!
//! Downloads the remote product image of every record into the local image
//! directory and points `image_url` at the served copy. Records that already
//! reference a local image are left alone, so the stage can be rerun after an
//! interrupted pass.

use crate::config::{CategoryConfig, Config};
use crate::crawler::{build_http_client, RateGovernor};
use crate::extract::SpeciesRecord;
use crate::storage::{read_collection, write_collection};
use crate::HarvestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// URL prefix under which downloaded images are served
pub const LOCAL_IMAGE_PREFIX: &str = "/images/";

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];
const DEFAULT_EXTENSION: &str = ".jpg";

/// Reasons a single download is given up
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected content type '{0}'")]
    NotAnImage(String),

    #[error("body of {0} bytes is below the minimum")]
    TooSmall(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    fn is_retryable(&self) -> bool {
        matches!(self, ImageError::Transport(_))
    }
}

/// Per-category counters of an image pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImageStats {
    pub fn add(&mut self, other: &ImageStats) {
        self.downloaded += other.downloaded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Downloaded,
    Skipped,
    Failed,
}

/// File extension for an image URL, `.jpg` when the path carries none we know
pub fn image_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default().to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|ext| path.ends_with(*ext))
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Downloads record images for each configured category
pub struct ImageRetriever {
    client: Client,
    image_dir: PathBuf,
    data_dir: PathBuf,
    min_bytes: u64,
    max_retries: u32,
    backoff: Duration,
    governor: RateGovernor,
}

impl ImageRetriever {
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.identity, &config.crawler)?;

        Ok(Self {
            client,
            image_dir: PathBuf::from(&config.postprocess.image_dir),
            data_dir: config.output.data_dir().to_path_buf(),
            min_bytes: config.postprocess.min_image_bytes,
            max_retries: config.crawler.max_retries.max(1),
            backoff: Duration::from_millis(config.crawler.retry_backoff_ms),
            governor: RateGovernor::fine(&config.rate_limit),
        })
    }

    /// Processes every record of `category` and persists the collection
    ///
    /// The collection is only rewritten when at least one `image_url` changed.
    pub async fn retrieve_category(
        &self,
        category: &CategoryConfig,
    ) -> Result<ImageStats, HarvestError> {
        let path = self.data_dir.join(category.collection_file());
        let mut records = read_collection(&path)?;
        let mut stats = ImageStats::default();
        let mut changed = false;

        tracing::info!(
            "Retrieving images for {} ({} records)",
            category.slug,
            records.len()
        );

        for record in records.iter_mut() {
            let before = record.image_url.clone();
            let outcome = self.retrieve_record(&category.slug, record).await;
            changed |= record.image_url != before;

            match outcome {
                Outcome::Downloaded => {
                    stats.downloaded += 1;
                    self.governor.wait().await;
                }
                Outcome::Skipped => stats.skipped += 1,
                Outcome::Failed => stats.failed += 1,
            }
        }

        if changed {
            write_collection(&path, &records)?;
        }

        tracing::info!(
            "{}: {} downloaded, {} skipped, {} failed",
            category.slug,
            stats.downloaded,
            stats.skipped,
            stats.failed
        );
        Ok(stats)
    }

    async fn retrieve_record(&self, slug: &str, record: &mut SpeciesRecord) -> Outcome {
        if record.id.is_empty() || record.image_url.is_empty() {
            return Outcome::Failed;
        }
        if record.image_url.starts_with(LOCAL_IMAGE_PREFIX) {
            return Outcome::Skipped;
        }

        let ext = image_extension(&record.image_url);
        let file_name = format!("{}{}", record.id, ext);
        let local_path = self.image_dir.join(slug).join(&file_name);
        let served_path = format!("{}{}/{}", LOCAL_IMAGE_PREFIX, slug, file_name);

        if self.is_complete(&local_path) {
            record.image_url = served_path;
            return Outcome::Skipped;
        }

        match self.download(&record.image_url, &local_path).await {
            Ok(bytes) => {
                tracing::debug!("Saved {} ({} bytes)", local_path.display(), bytes);
                record.image_url = served_path;
                Outcome::Downloaded
            }
            Err(e) => {
                tracing::warn!("Image for {} not retrieved: {}", record.id, e);
                Outcome::Failed
            }
        }
    }

    fn is_complete(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.len() > self.min_bytes)
            .unwrap_or(false)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<usize, ImageError> {
        let mut attempt = 1;
        let body = loop {
            match self.fetch_image(url).await {
                Ok(body) => break body,
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    tracing::debug!(
                        "[Attempt {}/{}] Image {}: {}",
                        attempt,
                        self.max_retries,
                        url,
                        e
                    );
                    tokio::time::sleep(self.backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &body).await?;
        Ok(body.len())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Transport(format!("HTTP status {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        if !content_type.contains("image") && !content_type.contains("jpeg") {
            return Err(ImageError::NotAnImage(content_type));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ImageError::Transport(e.to_string()))?;
        if (body.len() as u64) < self.min_bytes {
            return Err(ImageError::TooSmall(body.len()));
        }

        Ok(body.to_vec())
    }
}

/// Runs the image pass over every configured category
pub async fn retrieve_images(config: &Config) -> Result<ImageStats, HarvestError> {
    let retriever = ImageRetriever::new(config)?;
    let mut total = ImageStats::default();

    for category in &config.categories {
        let stats = retriever.retrieve_category(category).await?;
        total.add(&stats);
    }

    Ok(total)
}
