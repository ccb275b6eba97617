//! In-memory credential store.

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use promptassist_protocols::{CredentialChange, CredentialError, CredentialStore};

use crate::{CHANGE_CAPACITY, normalize_key};

/// Credential store that lives for the process. Used by tests and by hosts
/// that receive the key from elsewhere.
pub struct MemoryCredentialStore {
    value: RwLock<Option<String>>,
    changes: broadcast::Sender<CredentialChange>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            value: RwLock::new(None),
            changes,
        }
    }

    /// Store seeded with a credential. No notification is sent for the seed.
    pub fn with_credential(value: impl Into<String>) -> Self {
        let store = Self::new();
        *store.value.write() = Some(value.into());
        store
    }

    fn replace(&self, new_value: Option<String>) {
        let old_value = {
            let mut value = self.value.write();
            if *value == new_value {
                return;
            }
            std::mem::replace(&mut *value, new_value.clone())
        };
        // No subscribers is fine.
        let receivers = self
            .changes
            .send(CredentialChange::new(old_value, new_value))
            .unwrap_or(0);
        debug!("Credential change sent to {} subscriber(s)", receivers);
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.value.read().clone())
    }

    async fn set(&self, value: &str) -> Result<(), CredentialError> {
        let value = normalize_key(value)?;
        self.replace(Some(value));
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        self.replace(None);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<CredentialChange> {
        self.changes.subscribe()
    }
}
