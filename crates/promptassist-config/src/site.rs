//! Site descriptors.
//!
//! A descriptor tells the overlay how to adapt to one chat site: where its
//! prompt inputs are, where the button goes, and how the button looks. Only
//! the selectors and the insert position are mandatory.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use promptassist_dom::InsertPosition;

use crate::error::ConfigError;

/// Declarative adaptation for one URL pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    /// Host (and optional path prefix) this descriptor applies to.
    pub pattern: UrlPattern,

    /// Display name for logs and the CLI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Input selectors. All of them are queried; earlier ones are listed first.
    pub input_selectors: Vec<String>,

    /// Where the action button is inserted.
    pub button_container: ButtonContainer,

    #[serde(default)]
    pub visual: ButtonVisual,

    #[serde(default)]
    pub styles: ButtonStyles,
}

impl SiteDescriptor {
    /// Name for display, falling back to the pattern.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.pattern.as_str())
    }
}

/// Button container selector and insertion rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonContainer {
    pub selector: String,
    pub insert_position: InsertPosition,
}

// ----------------------------------------------------------------------
// URL patterns
// ----------------------------------------------------------------------

/// Host pattern with an optional path prefix, e.g. `chat.example.com` or
/// `example.com/chat`. A trailing `/*` is accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UrlPattern {
    raw: String,
    host: String,
    path: Option<String>,
}

impl UrlPattern {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        let stripped = without_scheme.trim_end_matches('*').trim_end_matches('/');

        let (host, path) = match stripped.find('/') {
            Some(idx) => (&stripped[..idx], Some(stripped[idx..].to_string())),
            None => (stripped, None),
        };
        if host.is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: raw.to_string(),
                message: "missing host".to_string(),
            });
        }

        Ok(Self {
            raw: trimmed.to_string(),
            host: host.to_ascii_lowercase(),
            path,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Path-bearing patterns match when `host + path` contains the pattern's
    /// `host + path`; host-only patterns match when the host contains it.
    pub fn matches(&self, host: &str, path: &str) -> bool {
        let host = host.to_ascii_lowercase();
        match &self.path {
            Some(prefix) => {
                format!("{}{}", host, path).contains(&format!("{}{}", self.host, prefix))
            }
            None => host.contains(&self.host),
        }
    }

    pub fn matches_url(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| self.matches(host, url.path()))
    }

    /// Whether every location matched by `other` is also matched by `self`,
    /// so `other` can never win when registered after `self`.
    pub fn shadows(&self, other: &UrlPattern) -> bool {
        match (&self.path, &other.path) {
            (None, _) => other.host.contains(&self.host),
            (Some(_), None) => false,
            (Some(mine), Some(theirs)) => {
                format!("{}{}", other.host, theirs).contains(&format!("{}{}", self.host, mine))
            }
        }
    }
}

impl TryFrom<String> for UrlPattern {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UrlPattern> for String {
    fn from(pattern: UrlPattern) -> Self {
        pattern.raw
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ----------------------------------------------------------------------
// Visuals
// ----------------------------------------------------------------------

/// Built-in button glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Glyph {
    #[default]
    Sparkles,
    Wand,
}

impl Glyph {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sparkles => "sparkles",
            Self::Wand => "wand",
        }
    }
}

/// Icon and colors of the action button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonVisual {
    /// Icon image path or URL. When unset the built-in glyph is drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub glyph: Glyph,

    /// Icon height in pixels.
    #[serde(default = "default_icon_size")]
    pub icon_size: u32,

    /// Icon width divided by height.
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f32,

    #[serde(default)]
    pub colors: StateColors,
}

impl Default for ButtonVisual {
    fn default() -> Self {
        Self {
            image: None,
            glyph: Glyph::default(),
            icon_size: default_icon_size(),
            aspect_ratio: default_aspect_ratio(),
            colors: StateColors::default(),
        }
    }
}

impl ButtonVisual {
    /// Icon width in pixels, derived from size and aspect ratio.
    pub fn icon_width(&self) -> u32 {
        (self.icon_size as f32 * self.aspect_ratio).round() as u32
    }
}

fn default_icon_size() -> u32 {
    24
}

fn default_aspect_ratio() -> f32 {
    1.0
}

/// Icon color per interaction state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateColors {
    #[serde(default = "default_normal_color")]
    pub normal: String,
    #[serde(default = "default_hover_color")]
    pub hover: String,
    #[serde(default = "default_disabled_color")]
    pub disabled: String,
}

impl Default for StateColors {
    fn default() -> Self {
        Self {
            normal: default_normal_color(),
            hover: default_hover_color(),
            disabled: default_disabled_color(),
        }
    }
}

fn default_normal_color() -> String {
    "#ffffff".to_string()
}

fn default_hover_color() -> String {
    "#ffffff".to_string()
}

fn default_disabled_color() -> String {
    "#9ca3af".to_string()
}

// ----------------------------------------------------------------------
// Style rules
// ----------------------------------------------------------------------

/// Presentation rules per button state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonStyles {
    #[serde(default = "default_base_style")]
    pub base: StyleRules,
    #[serde(default = "default_hover_style")]
    pub hover: StyleRules,
    #[serde(default = "default_disabled_style")]
    pub disabled: StyleRules,
}

impl Default for ButtonStyles {
    fn default() -> Self {
        Self {
            base: default_base_style(),
            hover: default_hover_style(),
            disabled: default_disabled_style(),
        }
    }
}

fn default_base_style() -> StyleRules {
    StyleRules::parse_css(
        "cursor: pointer; position: relative; z-index: 1000; background: none; border: none; \
         padding: 7px; border-radius: 6px; display: inline-flex; align-items: center; \
         justify-content: center",
    )
}

fn default_hover_style() -> StyleRules {
    StyleRules::parse_css("background-color: #18181B")
}

fn default_disabled_style() -> StyleRules {
    StyleRules::parse_css("opacity: 0.5; cursor: not-allowed; background-color: #4a4a4a")
}

/// Ordered CSS property/value pairs. Values are opaque.
///
/// Deserializes from a declaration string (`"padding: 7px; border: none"`)
/// or from a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StyleRulesRepr", into = "String")]
pub struct StyleRules(Vec<(String, String)>);

#[derive(Deserialize)]
#[serde(untagged)]
enum StyleRulesRepr {
    Css(String),
    Table(BTreeMap<String, String>),
}

impl From<StyleRulesRepr> for StyleRules {
    fn from(repr: StyleRulesRepr) -> Self {
        match repr {
            StyleRulesRepr::Css(css) => Self::parse_css(&css),
            StyleRulesRepr::Table(table) => {
                let mut rules = Self::default();
                for (property, value) in table {
                    rules.set(&property, &value);
                }
                rules
            }
        }
    }
}

impl From<StyleRules> for String {
    fn from(rules: StyleRules) -> Self {
        rules.to_css()
    }
}

impl StyleRules {
    /// Parse `property: value; ...`. Malformed declarations are skipped.
    pub fn parse_css(css: &str) -> Self {
        let mut rules = Self::default();
        for declaration in css.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let (property, value) = (property.trim(), value.trim());
            if !property.is_empty() && !value.is_empty() {
                rules.set(property, value);
            }
        }
        rules
    }

    /// Set a property, replacing an earlier value in place.
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.to_ascii_lowercase();
        match self.0.iter_mut().find(|(p, _)| *p == property) {
            Some((_, current)) => *current = value.to_string(),
            None => self.0.push((property, value.to_string())),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(p, _)| p.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `self` overlaid with `other`; properties in `other` win.
    pub fn merged(&self, other: &StyleRules) -> StyleRules {
        let mut out = self.clone();
        for (property, value) in other.iter() {
            out.set(property, value);
        }
        out
    }

    /// Serialize as an inline `style` attribute value.
    pub fn to_css(&self) -> String {
        self.0
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
#[path = "site_tests.rs"]
mod tests;
