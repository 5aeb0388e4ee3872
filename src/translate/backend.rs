//! External machine-translation backends

use crate::config::{IdentityConfig, TranslationConfig};
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// A single request/response translation call
///
/// Implementations make exactly one attempt; retry and fallback live in
/// [`NameProtectingTranslator`](crate::translate::NameProtectingTranslator).
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, HarvestError>;
}

/// The free Google Translate `translate_a/single` endpoint
pub struct GoogleTranslateBackend {
    client: Client,
    endpoint: String,
    source_language: String,
    target_language: String,
}

impl GoogleTranslateBackend {
    pub fn new(config: &TranslationConfig, identity: &IdentityConfig) -> Result<Self, HarvestError> {
        let client = Client::builder()
            .user_agent(identity.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
        })
    }
}

#[async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate(&self, text: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source_language.as_str()),
                ("tl", self.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::HttpStatus {
                url: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        parse_google_response(&body)
    }
}

/// Joins the translated segments of a `translate_a/single` response
///
/// The payload is `[[[translated, original, ...], ...], ...]`; segments
/// without a translated string are skipped.
pub fn parse_google_response(body: &Value) -> Result<String, HarvestError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| HarvestError::Translation("response carries no segment list".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}
