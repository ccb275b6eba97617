//! Configuration validation.

use promptassist_dom::SelectorList;

use crate::builtin::builtin_sites;
use crate::error::ConfigError;
use crate::schema::Config;
use crate::site::SiteDescriptor;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_overlay(config, &mut result);
        Self::validate_provider(config, &mut result);
        Self::validate_sites(config, &mut result);

        Ok(result)
    }

    /// Validate descriptors on their own, e.g. the built-in table.
    pub fn validate_sites_only(sites: &[SiteDescriptor]) -> ValidationResult {
        let mut result = ValidationResult::default();
        for (index, site) in sites.iter().enumerate() {
            Self::validate_site(&format!("sites[{}]", index), site, &mut result);
        }
        Self::check_shadowing(sites, &mut result);
        result
    }

    fn validate_overlay(config: &Config, result: &mut ValidationResult) {
        if config.overlay.revert_ms == 0 {
            result.add_error(ValidationError::new(
                "overlay.revert_ms",
                "revert_ms must be greater than 0",
            ));
        }

        if config.overlay.debounce_ms > 5_000 {
            result.add_warning(ValidationWarning::new(
                "overlay.debounce_ms",
                "debounce_ms is very high (>5000), rich editors will feel unresponsive",
            ));
        }
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        let provider = &config.provider;

        if provider.model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "provider.model",
                "Model cannot be empty",
            ));
        }

        if !provider.base_url.starts_with("http://") && !provider.base_url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "provider.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if provider.timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "provider.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_sites(config: &Config, result: &mut ValidationResult) {
        for (index, site) in config.sites.iter().enumerate() {
            Self::validate_site(&format!("sites[{}]", index), site, result);
        }

        // Shadowing depends on the effective registration order.
        let mut effective = if config.replace_builtin {
            Vec::new()
        } else {
            builtin_sites()
        };
        effective.extend(config.sites.iter().cloned());
        Self::check_shadowing(&effective, result);

        if config.replace_builtin && config.sites.is_empty() {
            result.add_warning(ValidationWarning::new(
                "replace_builtin",
                "Built-in sites are replaced but no sites are configured",
            ));
        }
    }

    fn validate_site(path: &str, site: &SiteDescriptor, result: &mut ValidationResult) {
        if site.input_selectors.is_empty() {
            result.add_error(ValidationError::new(
                format!("{}.input_selectors", path),
                "At least one input selector is required",
            ));
        }

        for (index, selector) in site.input_selectors.iter().enumerate() {
            Self::check_selector(&format!("{}.input_selectors[{}]", path, index), selector, result);
        }

        let container = &site.button_container.selector;
        if container.trim().is_empty() {
            result.add_error(ValidationError::new(
                format!("{}.button_container.selector", path),
                "Container selector cannot be empty",
            ));
        } else {
            Self::check_selector(&format!("{}.button_container.selector", path), container, result);
        }

        if site.visual.icon_size == 0 {
            result.add_warning(ValidationWarning::new(
                format!("{}.visual.icon_size", path),
                "icon_size is 0, the icon will not be visible",
            ));
        }

        if site.visual.aspect_ratio <= 0.0 {
            result.add_warning(ValidationWarning::new(
                format!("{}.visual.aspect_ratio", path),
                "aspect_ratio must be positive, the icon will not be visible",
            ));
        }
    }

    fn check_selector(path: &str, selector: &str, result: &mut ValidationResult) {
        if selector.trim().is_empty() {
            result.add_error(ValidationError::new(path, "Selector cannot be empty"));
            return;
        }
        if let Err(e) = SelectorList::parse(selector) {
            result.add_error(ValidationError::new(path, e.to_string()));
        }
    }

    fn check_shadowing(sites: &[SiteDescriptor], result: &mut ValidationResult) {
        for (later_index, later) in sites.iter().enumerate() {
            let shadowed_by = sites[..later_index]
                .iter()
                .find(|earlier| earlier.pattern.shadows(&later.pattern));
            if let Some(earlier) = shadowed_by {
                result.add_warning(ValidationWarning::new(
                    format!("sites.{}", later.pattern),
                    format!(
                        "Pattern '{}' is never reached: earlier pattern '{}' covers every URL",
                        later.pattern, earlier.pattern
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
