//! JSON-file credential store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs;
use tokio::sync::broadcast;
use tracing::{debug, info};

use promptassist_protocols::{CredentialChange, CredentialError, CredentialStore};

use crate::settings::StoredSettings;
use crate::{CHANGE_CAPACITY, normalize_key};

/// Credential store persisted as a JSON settings file.
///
/// The file is read once on open; afterwards this store is the only writer
/// and serves reads from its cache.
pub struct FileCredentialStore {
    path: PathBuf,
    settings: RwLock<StoredSettings>,
    changes: broadcast::Sender<CredentialChange>,
}

impl FileCredentialStore {
    /// Open the store. A missing file means no credential.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let path = path.as_ref().to_path_buf();
        let settings = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            if content.trim().is_empty() {
                StoredSettings::default()
            } else {
                serde_json::from_str(&content)
                    .map_err(|e| CredentialError::Corrupt(format!("{}: {}", path.display(), e)))?
            }
        } else {
            StoredSettings::default()
        };
        debug!(
            "Opened settings file {:?} (credential {})",
            path,
            if settings.gemini_api_key.is_some() { "present" } else { "absent" }
        );

        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Ok(Self {
            path,
            settings: RwLock::new(settings),
            changes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn replace(&self, new_value: Option<String>) -> Result<(), CredentialError> {
        let mut next = self.settings.read().clone();
        if next.gemini_api_key == new_value {
            return Ok(());
        }
        let old_value = std::mem::replace(&mut next.gemini_api_key, new_value.clone());

        self.persist(&next).await?;
        *self.settings.write() = next;

        let _ = self.changes.send(CredentialChange::new(old_value, new_value));
        Ok(())
    }

    async fn persist(&self, settings: &StoredSettings) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
                info!("Created settings directory: {:?}", parent);
            }
        }
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| CredentialError::Storage(e.to_string()))?;
        fs::write(&self.path, content).await?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    fn id(&self) -> &str {
        "file"
    }

    async fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.settings.read().gemini_api_key.clone())
    }

    async fn set(&self, value: &str) -> Result<(), CredentialError> {
        let value = normalize_key(value)?;
        self.replace(Some(value)).await
    }

    async fn clear(&self) -> Result<(), CredentialError> {
        self.replace(None).await
    }

    fn subscribe(&self) -> broadcast::Receiver<CredentialChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
