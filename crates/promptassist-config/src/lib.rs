//! # Prompt Assist Config
//!
//! Site Config Registry and application configuration.
//!
//! - [`SiteDescriptor`]: declarative per-site adaptation (selectors, insertion, styling)
//! - [`SiteRegistry`]: immutable, ordered lookup from page URL to descriptor
//! - [`Config`]: the TOML configuration file, loaded with [`ConfigLoader`]

mod builtin;
mod error;
mod loader;
mod registry;
mod schema;
mod site;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use registry::SiteRegistry;
pub use schema::*;
pub use site::{
    ButtonContainer, ButtonStyles, ButtonVisual, Glyph, SiteDescriptor, StateColors, StyleRules,
    UrlPattern,
};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
