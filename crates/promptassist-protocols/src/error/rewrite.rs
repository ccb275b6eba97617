//! Rewrite collaborator errors.
//!
//! The `Display` text of every variant is what ends up in the button
//! tooltip, so messages are written for end users.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("Gemini API key not found. Please set it in the extension settings.")]
    MissingCredential,

    #[error("Please provide a non-empty prompt")]
    EmptyPrompt,

    #[error("API error: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Received empty response from AI")]
    EmptyResponse,

    #[error("Credential store error: {0}")]
    Credential(#[from] super::CredentialError),
}

impl RewriteError {
    /// Build an API error from a status code and the provider's message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = RewriteError::api(500, "500");
        assert_eq!(err.to_string(), "API error: 500");
    }

    #[test]
    fn test_api_error_keeps_status() {
        match RewriteError::api(429, "quota exceeded") {
            RewriteError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_missing_credential_message() {
        let err = RewriteError::MissingCredential;
        assert!(err.to_string().contains("API key not found"));
    }

    #[test]
    fn test_empty_response_message() {
        assert_eq!(
            RewriteError::EmptyResponse.to_string(),
            "Received empty response from AI"
        );
    }

    #[test]
    fn test_from_credential_error() {
        let err: RewriteError = super::super::CredentialError::Storage("disk full".into()).into();
        assert!(err.to_string().contains("disk full"));
    }
}
