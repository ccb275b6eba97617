//! Credential store errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Please enter a valid API key")]
    InvalidKey,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt settings file: {0}")]
    Corrupt(String),
}

impl From<std::io::Error> for CredentialError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
