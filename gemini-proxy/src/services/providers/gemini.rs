//! Gemini AI provider implementation.
//!
//! Sends a single non-streaming `generateContent` call per request. There is no
//! request timeout and no retry: a slow vendor holds the
//! caller's request open until Gemini answers or the connection drops.

use super::{ProviderError, VisionProvider};
use crate::models::{GenerateContentResponse, OutboundPayload};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// Used when Gemini fails without an `error.message` in its body.
const UNKNOWN_API_ERROR: &str = "Unknown API error";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
}

/// Gemini vision provider.
pub struct GeminiVisionProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiVisionProvider {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Build the API URL for the given method. The key travels as a query parameter.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method,
            self.config.api_key.expose_secret()
        )
    }
}

#[async_trait]
impl VisionProvider for GeminiVisionProvider {
    async fn analyze(&self, payload: &OutboundPayload) -> Result<Option<String>, ProviderError> {
        let url = self.api_url("generateContent");

        tracing::debug!(model = %self.config.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            // reqwest errors embed the URL, and with it the key.
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        let status = response.status();

        // Any JSON is accepted whatever the status; only a non-JSON body is malformed.
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;
        let reply: GenerateContentResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        if !status.is_success() {
            let details = reply
                .error_message()
                .unwrap_or(UNKNOWN_API_ERROR)
                .to_string();

            tracing::warn!(status = status.as_u16(), details = %details, "Gemini API returned an error");

            return Err(ProviderError::Api {
                status: status.as_u16(),
                details,
            });
        }

        Ok(reply.first_text().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(api_base: &str) -> GeminiVisionProvider {
        GeminiVisionProvider::new(GeminiConfig {
            api_key: Secret::new("secret-key".to_string()),
            model: "gemini-test".to_string(),
            api_base: api_base.to_string(),
        })
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            provider("https://generativelanguage.googleapis.com/v1beta").api_url("generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-test:generateContent?key=secret-key"
        );
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        assert_eq!(
            provider("http://127.0.0.1:9000/").api_url("generateContent"),
            "http://127.0.0.1:9000/models/gemini-test:generateContent?key=secret-key"
        );
    }
}
