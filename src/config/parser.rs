use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that reports from different runs can be matched to
/// the configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL: &str = r#"
[site]
base-url = "https://www.liveaquaria.com"

[output]
data-dir = "./data"

[[category]]
name = "Marine Fish"
name-tr = "Deniz Balıkları"
slug = "marine-fish"
url = "/category/15/marine-fish"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].slug, "marine-fish");
        assert_eq!(config.categories[0].category_id().as_deref(), Some("15"));
        assert_eq!(config.output.index_file, "categories.json");
    }

    #[test]
    fn test_defaults_match_catalog_conventions() {
        let config = parse_config(MINIMAL).unwrap();

        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.crawler.max_listing_pages, 30);
        assert_eq!(config.crawler.page_size, 24);
        assert_eq!(config.translation.max_chars, 4000);
        assert_eq!(config.translation.target_language, "tr");
        assert_eq!(config.rate_limit.product_delay_min_ms, 1000);
        assert_eq!(config.rate_limit.product_delay_max_ms, 2500);
        assert_eq!(config.site.media_host, "liveaquaria");
    }

    #[test]
    fn test_overrides() {
        let content = format!(
            "{}\n{}",
            r#"
[crawler]
max-retries = 5
page-size = 48

[rate-limit]
product-delay-min-ms = 0
product-delay-max-ms = 0
"#,
            MINIMAL
        );
        let config = parse_config(&content).unwrap();

        assert_eq!(config.crawler.max_retries, 5);
        assert_eq!(config.crawler.page_size, 48);
        // untouched keys keep their defaults
        assert_eq!(config.crawler.max_listing_pages, 30);
        assert_eq!(config.rate_limit.product_delay_max_ms, 0);
        assert_eq!(config.rate_limit.translation_delay_max_ms, 800);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = MINIMAL.replace("/category/15/marine-fish", "/marine-fish");
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
