//! Rewrite collaborator protocol.
//!
//! A rewriter takes the user's draft prompt and returns an improved version
//! together with a short analysis. It is called at most once per click.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RewriteError;

/// Result of a single rewrite call. Consumed once, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    /// The rewritten prompt.
    pub enhanced_prompt: String,

    /// Short summary of what was improved.
    pub analysis: String,
}

impl RewriteResult {
    pub fn new(enhanced_prompt: impl Into<String>, analysis: impl Into<String>) -> Self {
        Self {
            enhanced_prompt: enhanced_prompt.into(),
            analysis: analysis.into(),
        }
    }

    /// Whether the enhanced prompt can be written back into the page.
    ///
    /// Both fields must be non-blank; a response missing either section is
    /// treated as a failed rewrite.
    pub fn is_valid(&self) -> bool {
        !self.enhanced_prompt.trim().is_empty() && !self.analysis.trim().is_empty()
    }
}

/// Core trait for rewrite collaborators.
#[async_trait]
pub trait Rewriter: Send + Sync {
    /// Returns the rewriter ID.
    fn id(&self) -> &str;

    /// Improve a prompt.
    async fn improve(&self, prompt: &str) -> Result<RewriteResult, RewriteError>;
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
