//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::loader::ConfigLoader;
use crate::site::SiteDescriptor;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Drop the built-in descriptors and use only `sites`.
    #[serde(default)]
    pub replace_builtin: bool,

    /// Extra site descriptors, registered after the built-in ones.
    #[serde(default)]
    pub sites: Vec<SiteDescriptor>,
}

impl Config {
    /// `~/.promptassist/config.toml`
    pub fn default_path() -> PathBuf {
        data_dir().join("config.toml")
    }
}

/// Base directory for configuration, credentials and logs.
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".promptassist")
}

/// Whether inputs are discovered while no credential is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryPolicy {
    /// Discover and bind regardless; buttons render as `NoCredential`.
    #[default]
    Always,
    /// Skip discovery until a credential exists.
    RequireCredential,
}

/// Engine timings and discovery policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Debounce for rich-editor content changes.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Delay before a success or error indicator reverts.
    #[serde(default = "default_revert_ms")]
    pub revert_ms: u64,

    #[serde(default)]
    pub discovery: DiscoveryPolicy,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            revert_ms: default_revert_ms(),
            discovery: DiscoveryPolicy::default(),
        }
    }
}

impl OverlayConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.revert_ms)
    }
}

fn default_debounce_ms() -> u64 {
    150
}

fn default_revert_ms() -> u64 {
    2000
}

/// Rewrite provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fallback key used when the credential store holds none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: default_request_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    60
}

/// Credential storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the credential. Defaults to `~/.promptassist/storage.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => PathBuf::from(ConfigLoader::expand_path(path)),
            None => data_dir().join("storage.json"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. Defaults to `~/.promptassist/logs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

impl LoggingConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(ConfigLoader::expand_path(dir)),
            None => data_dir().join("logs"),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
