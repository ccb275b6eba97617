//! Credential stores for Prompt Assist.
//!
//! Both stores hold the single API key the rewriter needs and broadcast one
//! [`CredentialChange`] per effective change, so every open page can update
//! its buttons without polling.
//!
//! ## Storage Format
//!
//! [`FileCredentialStore`] keeps the key in a small JSON document, next to
//! any other settings already in the file:
//!
//! ```json
//! { "geminiApiKey": "AIza..." }
//! ```
//!
//! [`CredentialChange`]: promptassist_protocols::CredentialChange

mod file;
mod memory;
mod settings;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
pub use settings::StoredSettings;

use promptassist_protocols::CredentialError;

/// Capacity of the change channel. Slow subscribers re-read on lag.
const CHANGE_CAPACITY: usize = 16;

/// Trim a key and reject blank ones.
pub(crate) fn normalize_key(value: &str) -> Result<String, CredentialError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::InvalidKey);
    }
    Ok(trimmed.to_string())
}
