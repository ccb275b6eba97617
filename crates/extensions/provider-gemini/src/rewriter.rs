//! Gemini-backed prompt rewriter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use promptassist_config::ProviderConfig;
use promptassist_protocols::{CredentialStore, RewriteError, RewriteResult, Rewriter};

use crate::client::GeminiClient;
use crate::prompt::{build_prompt, extract_result};
use crate::types::{Content, GenerateContentRequest};

/// Rewriter that asks Gemini to improve a prompt.
///
/// The API key is read from the credential store on every call, so a key
/// saved while pages are open is picked up by the next click.
pub struct GeminiRewriter {
    client: GeminiClient,
    model: String,
    credentials: Arc<dyn CredentialStore>,
}

impl GeminiRewriter {
    pub fn new(
        client: GeminiClient,
        model: impl Into<String>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            credentials,
        }
    }

    /// Build from the `[provider]` config section.
    pub fn from_config(
        config: &ProviderConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, RewriteError> {
        let client = GeminiClient::new(
            &config.base_url,
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::new(client, &config.model, credentials))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn api_key(&self) -> Result<String, RewriteError> {
        self.credentials
            .get()
            .await?
            .filter(|key| !key.trim().is_empty())
            .ok_or(RewriteError::MissingCredential)
    }
}

#[async_trait]
impl Rewriter for GeminiRewriter {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn improve(&self, prompt: &str) -> Result<RewriteResult, RewriteError> {
        if prompt.trim().is_empty() {
            return Err(RewriteError::EmptyPrompt);
        }
        let api_key = self.api_key().await?;

        let request = GenerateContentRequest {
            contents: vec![Content::text(build_prompt(prompt))],
        };
        let response = self
            .client
            .generate_content(&self.model, &api_key, &request)
            .await?;

        let result = extract_result(response.first_text());
        if result.is_valid() {
            info!(
                "Gemini improved a {}-char prompt into {} chars",
                prompt.trim().chars().count(),
                result.enhanced_prompt.chars().count()
            );
        } else {
            debug!("Gemini reply is missing a section");
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "rewriter_tests.rs"]
mod tests;
