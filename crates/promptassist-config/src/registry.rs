//! Site registry.
//!
//! Lookup walks descriptors in registration order and returns the first
//! match. There is no specificity ranking: when patterns overlap, the one
//! registered first wins, and [`crate::ConfigValidator`] warns about entries
//! that can never be reached.

use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::builtin::builtin_sites;
use crate::error::ConfigError;
use crate::schema::Config;
use crate::site::SiteDescriptor;

/// Immutable, ordered URL-to-descriptor table.
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: Vec<Arc<SiteDescriptor>>,
}

impl SiteRegistry {
    pub fn new(sites: Vec<SiteDescriptor>) -> Self {
        Self {
            sites: sites.into_iter().map(Arc::new).collect(),
        }
    }

    /// Registry holding only the built-in descriptors.
    pub fn builtin() -> Self {
        Self::new(builtin_sites())
    }

    /// Built-in descriptors followed by the configured ones, or only the
    /// configured ones when `replace_builtin` is set.
    pub fn from_config(config: &Config) -> Self {
        let mut sites = if config.replace_builtin {
            Vec::new()
        } else {
            builtin_sites()
        };
        sites.extend(config.sites.iter().cloned());
        Self::new(sites)
    }

    /// First descriptor whose pattern matches the URL.
    pub fn resolve(&self, url: &Url) -> Option<Arc<SiteDescriptor>> {
        let found = self.sites.iter().find(|site| site.pattern.matches_url(url));
        match found {
            Some(site) => debug!("Resolved {} to site '{}'", url, site.display_name()),
            None => debug!("No site descriptor for {}", url),
        }
        found.cloned()
    }

    /// Parse and resolve a URL string.
    pub fn resolve_str(&self, url: &str) -> Result<Option<Arc<SiteDescriptor>>, ConfigError> {
        let url = Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(self.resolve(&url))
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteDescriptor> {
        self.sites.iter().map(|site| site.as_ref())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
