//! Credential store protocol.
//!
//! The store holds a single API key. It has one writer (the settings
//! surface) and many readers (every button's state evaluation); readers learn
//! about changes through a broadcast subscription.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::CredentialError;

/// Core trait for credential stores.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Read the current credential.
    async fn get(&self) -> Result<Option<String>, CredentialError>;

    /// Store a credential. Blank values are rejected.
    async fn set(&self, value: &str) -> Result<(), CredentialError>;

    /// Remove the credential.
    async fn clear(&self) -> Result<(), CredentialError>;

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<CredentialChange>;
}

/// A single credential change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialChange {
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl CredentialChange {
    pub fn new(old_value: Option<String>, new_value: Option<String>) -> Self {
        Self {
            old_value,
            new_value,
        }
    }

    /// Classify the change by credential presence before and after.
    pub fn transition(&self) -> CredentialTransition {
        let had = present(self.old_value.as_deref());
        let has = present(self.new_value.as_deref());
        match (had, has) {
            (false, true) => CredentialTransition::Added,
            (true, false) => CredentialTransition::Removed,
            (true, true) if self.old_value != self.new_value => CredentialTransition::Rotated,
            _ => CredentialTransition::Unchanged,
        }
    }
}

/// What a credential change means for the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialTransition {
    /// No credential before, one now.
    Added,
    /// A credential before, none now.
    Removed,
    /// Replaced by a different non-empty value.
    Rotated,
    /// Presence and value unchanged.
    Unchanged,
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_added() {
        let change = CredentialChange::new(None, Some("key".into()));
        assert_eq!(change.transition(), CredentialTransition::Added);
    }

    #[test]
    fn test_transition_removed() {
        let change = CredentialChange::new(Some("key".into()), None);
        assert_eq!(change.transition(), CredentialTransition::Removed);
    }

    #[test]
    fn test_transition_blank_counts_as_absent() {
        let change = CredentialChange::new(Some("key".into()), Some("  ".into()));
        assert_eq!(change.transition(), CredentialTransition::Removed);
    }

    #[test]
    fn test_transition_rotated() {
        let change = CredentialChange::new(Some("a".into()), Some("b".into()));
        assert_eq!(change.transition(), CredentialTransition::Rotated);
    }

    #[test]
    fn test_transition_unchanged() {
        let change = CredentialChange::new(Some("a".into()), Some("a".into()));
        assert_eq!(change.transition(), CredentialTransition::Unchanged);
        let change = CredentialChange::new(None, None);
        assert_eq!(change.transition(), CredentialTransition::Unchanged);
    }

    #[test]
    fn test_change_serialization() {
        let change = CredentialChange::new(None, Some("k".into()));
        let json = serde_json::to_value(&change).unwrap();
        assert!(json["oldValue"].is_null());
        assert_eq!(json["newValue"], "k");
    }
}
