//! Shared setup for subcommands.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use promptassist_config::{Config, ConfigError, ConfigLoader, SiteRegistry};
use promptassist_protocols::{CredentialError, CredentialStore, RewriteError};
use promptassist_provider_gemini::GeminiRewriter;
use promptassist_settings_store::{FileCredentialStore, MemoryCredentialStore};

/// Loaded configuration plus the collaborators built from it.
pub(crate) struct AppContext {
    pub config: Config,
    pub config_path: PathBuf,
}

impl AppContext {
    /// Load the config file; a missing file means defaults.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = path.unwrap_or_else(Config::default_path);
        let config = ConfigLoader::load_or_default(&config_path)?;
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn registry(&self) -> SiteRegistry {
        SiteRegistry::from_config(&self.config)
    }

    /// The settings file behind `key set|show|clear`.
    pub async fn settings_store(&self) -> Result<FileCredentialStore, CredentialError> {
        FileCredentialStore::open(self.config.storage.resolved_path()).await
    }

    /// Credential source for rewrites. A key in `[provider]` takes precedence
    /// over the settings file.
    pub async fn credential_store(&self) -> Result<Arc<dyn CredentialStore>, CredentialError> {
        let configured = self
            .config
            .provider
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());
        match configured {
            Some(key) => {
                debug!("Using API key from {}", self.config_path.display());
                Ok(Arc::new(MemoryCredentialStore::with_credential(key)))
            }
            None => Ok(Arc::new(self.settings_store().await?)),
        }
    }

    pub fn rewriter(
        &self,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<GeminiRewriter, RewriteError> {
        GeminiRewriter::from_config(&self.config.provider, credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert!(ctx.config.provider.api_key.is_none());
        assert!(!ctx.registry().is_empty());
    }

    #[tokio::test]
    async fn test_configured_key_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("storage.json");
        let path = write_config(
            &dir,
            &format!(
                "[provider]\napi_key = \"from-config\"\n\n[storage]\npath = {:?}\n",
                storage.display().to_string()
            ),
        );
        let ctx = AppContext::load(Some(path)).unwrap();

        let store = ctx.credential_store().await.unwrap();
        assert_eq!(store.id(), "memory");
        assert_eq!(store.get().await.unwrap().as_deref(), Some("from-config"));
    }

    #[tokio::test]
    async fn test_settings_file_used_without_configured_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("storage.json");
        std::fs::write(&storage, r#"{"geminiApiKey": "stored"}"#).unwrap();
        let path = write_config(
            &dir,
            &format!("[storage]\npath = {:?}\n", storage.display().to_string()),
        );
        let ctx = AppContext::load(Some(path)).unwrap();

        let store = ctx.credential_store().await.unwrap();
        assert_eq!(store.id(), "file");
        assert_eq!(store.get().await.unwrap().as_deref(), Some("stored"));
        assert!(ctx.rewriter(store).is_ok());
    }

    #[tokio::test]
    async fn test_blank_configured_key_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("storage.json");
        let path = write_config(
            &dir,
            &format!(
                "[provider]\napi_key = \"  \"\n\n[storage]\npath = {:?}\n",
                storage.display().to_string()
            ),
        );
        let ctx = AppContext::load(Some(path)).unwrap();
        let store = ctx.credential_store().await.unwrap();
        assert_eq!(store.id(), "file");
        assert!(store.get().await.unwrap().is_none());
    }
}
