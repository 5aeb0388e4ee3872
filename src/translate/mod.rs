//! Name-protecting translation
//!
//! Free text (descriptions, feeding notes) goes through a general-purpose
//! machine translator that happily translates species names word by word.
//! [`NameProtectingTranslator`] hides every known name behind a placeholder
//! for the round trip and memoizes results by the placeholder-bearing text.
//! Categorical attributes never reach it; they use the [`lookup`] tables.

mod backend;
mod lookup;
mod protect;
mod registry;

pub use backend::{parse_google_response, GoogleTranslateBackend, TranslationBackend};
pub use lookup::{
    translate_attributes, translate_field, LookupTable, CARE_LEVEL_TR, DIET_TR, REEF_COMPAT_TR,
    TEMPERAMENT_TR,
};
pub use protect::{placeholder_token, protect, restore, Placeholder, ProtectedText};
pub use registry::{NameRegistry, ProtectedName, MIN_PROTECTED_CHARS};

use crate::config::{Config, TranslationConfig};
use crate::extract::truncate_chars;
use crate::HarvestError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Counters for one run of the translator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    /// Texts that needed a backend call
    pub requests: usize,
    pub cache_hits: usize,
    /// Texts returned untranslated after exhausting retries
    pub failures: usize,
}

/// Translates free text while keeping protected names verbatim
pub struct NameProtectingTranslator {
    registry: Arc<NameRegistry>,
    backend: Box<dyn TranslationBackend>,
    /// Keyed by protected text, valued by the translation before restoration
    cache: HashMap<String, String>,
    max_chars: usize,
    max_retries: u32,
    retry_delay: Duration,
    stats: TranslationStats,
}

impl NameProtectingTranslator {
    pub fn new(
        registry: Arc<NameRegistry>,
        backend: Box<dyn TranslationBackend>,
        config: &TranslationConfig,
    ) -> Self {
        Self {
            registry,
            backend,
            cache: HashMap::new(),
            max_chars: config.max_chars,
            max_retries: config.max_retries.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            stats: TranslationStats::default(),
        }
    }

    /// Builds a translator backed by the configured Google endpoint
    pub fn from_config(config: &Config, registry: Arc<NameRegistry>) -> Result<Self, HarvestError> {
        let backend = GoogleTranslateBackend::new(&config.translation, &config.identity)?;
        Ok(Self::new(registry, Box::new(backend), &config.translation))
    }

    pub fn stats(&self) -> TranslationStats {
        self.stats
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    /// Translates `text`, protecting registry names and `extra_names`
    ///
    /// Blank input comes back unchanged. Input is trimmed, and only its
    /// first `max-chars` characters (after placeholder substitution) are
    /// sent. When every attempt fails, the trimmed source text is returned.
    pub async fn translate(&mut self, text: &str, extra_names: &[&str]) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let text = text.trim();

        let candidates = self.registry.candidates(extra_names);
        let protected = protect(text, candidates.iter().map(|candidate| &candidate.pattern));

        if let Some(translated) = self.cache.get(&protected.text) {
            self.stats.cache_hits += 1;
            return restore(translated, &protected.placeholders);
        }

        let request = truncate_chars(&protected.text, self.max_chars);
        self.stats.requests += 1;

        for attempt in 1..=self.max_retries {
            match self.backend.translate(request).await {
                Ok(translated) => {
                    let restored = restore(&translated, &protected.placeholders);
                    self.cache.insert(protected.text, translated);
                    return restored;
                }
                Err(e) if attempt < self.max_retries => {
                    tracing::debug!(
                        "[Attempt {}/{}] Translation failed: {}",
                        attempt,
                        self.max_retries,
                        e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => {
                    tracing::warn!("Translation failed, keeping source text: {}", e);
                }
            }
        }

        self.stats.failures += 1;
        text.to_string()
    }
}
