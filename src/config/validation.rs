use crate::config::types::{
    CategoryConfig, Config, CrawlerConfig, OutputConfig, RateLimitConfig, SiteConfig,
    TranslationConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_rate_limit_config(&config.rate_limit)?;
    validate_site_config(&config.site)?;
    validate_translation_config(&config.translation)?;
    validate_output_config(&config.output)?;
    validate_categories(&config.categories)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.max_listing_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-listing-pages must be >= 1, got {}",
            config.max_listing_pages
        )));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page-size must be >= 1, got {}",
            config.page_size
        )));
    }

    if config.request_timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request and connect timeouts must be at least one second".to_string(),
        ));
    }

    Ok(())
}

fn validate_rate_limit_config(config: &RateLimitConfig) -> Result<(), ConfigError> {
    if config.product_delay_min_ms > config.product_delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "product delay range is inverted: {}ms > {}ms",
            config.product_delay_min_ms, config.product_delay_max_ms
        )));
    }

    if config.translation_delay_min_ms > config.translation_delay_max_ms {
        return Err(ConfigError::Validation(format!(
            "translation delay range is inverted: {}ms > {}ms",
            config.translation_delay_min_ms, config.translation_delay_max_ms
        )));
    }

    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http(s), got '{}'",
            config.base_url
        )));
    }

    Ok(())
}

fn validate_translation_config(config: &TranslationConfig) -> Result<(), ConfigError> {
    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid translation endpoint: {}", e)))?;

    if config.source_language.is_empty() || config.target_language.is_empty() {
        return Err(ConfigError::Validation(
            "translation languages cannot be empty".to_string(),
        ));
    }

    if config.max_chars == 0 {
        return Err(ConfigError::Validation(
            "translation max-chars must be > 0".to_string(),
        ));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(
            "translation max-retries must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.data_dir.is_empty() {
        return Err(ConfigError::Validation(
            "data-dir cannot be empty".to_string(),
        ));
    }

    if config.index_file.is_empty() {
        return Err(ConfigError::Validation(
            "index-file cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_categories(categories: &[CategoryConfig]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[category]] is required".to_string(),
        ));
    }

    let mut slugs = HashSet::new();
    for category in categories {
        validate_slug(&category.slug)?;

        if !slugs.insert(category.slug.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category slug '{}'",
                category.slug
            )));
        }

        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty name",
                category.slug
            )));
        }

        if category.category_id().is_none() {
            return Err(ConfigError::Validation(format!(
                "category '{}' url '{}' carries no /category/<id>/ identifier",
                category.slug, category.url
            )));
        }
    }

    Ok(())
}

/// Slugs become file names, so they are kept to `[a-z0-9-]`
fn validate_slug(slug: &str) -> Result<(), ConfigError> {
    if slug.is_empty() {
        return Err(ConfigError::Validation(
            "category slug cannot be empty".to_string(),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "category slug '{}' must contain only lowercase letters, digits and hyphens",
            slug
        )));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(ConfigError::Validation(format!(
            "category slug '{}' cannot start or end with '-'",
            slug
        )));
    }

    Ok(())
}
