//! Gemini API client.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use promptassist_protocols::RewriteError;

use crate::types::*;

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for `base_url` (e.g. `https://generativelanguage.googleapis.com/v1beta`).
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self, RewriteError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| RewriteError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate content (non-streaming). One attempt, no retries.
    pub async fn generate_content(
        &self,
        model: &str,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, RewriteError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!("Gemini generate_content: model={}", model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| RewriteError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RewriteError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .ok()
                .map(|e| e.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| status.as_u16().to_string())
                });
            return Err(RewriteError::api(status.as_u16(), message));
        }

        serde_json::from_str(&body).map_err(|e| RewriteError::MalformedResponse(e.to_string()))
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
