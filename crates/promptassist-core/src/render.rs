//! Action button rendering.
//!
//! Rendering is idempotent: attributes are only written when they change and
//! the icon subtree is only rebuilt when a different icon is needed, so the
//! mutation records a render produces die out after one pass.

use promptassist_config::{ButtonVisual, Glyph, SiteDescriptor, StyleRules};
use promptassist_dom::{Document, DomError, NodeId};

use crate::locator::OWNED_ATTRIBUTE;
use crate::state::ButtonState;

pub const BUTTON_CLASS: &str = "prompt-assist-button";

const SUCCESS_COLOR: &str = "#34C759";
const ERROR_COLOR: &str = "#FF3B30";
const SVG_NS: &str = "http://www.w3.org/2000/svg";

const SPARKLES_PATHS: &[&str] = &[
    "M9.937 15.5A2 2 0 0 0 8.5 14.063l-6.135-1.582a.5.5 0 0 1 0-.962L8.5 9.936A2 2 0 0 0 9.937 8.5l1.582-6.135a.5.5 0 0 1 .963 0L14.063 8.5A2 2 0 0 0 15.5 9.937l6.135 1.581a.5.5 0 0 1 0 .964L15.5 14.063a2 2 0 0 0-1.437 1.437l-1.582 6.135a.5.5 0 0 1-.963 0z",
    "M20 3v4",
    "M22 5h-4",
    "M4 17v2",
    "M5 18H3",
];

const WAND_PATHS: &[&str] = &[
    "m21.64 3.64-1.28-1.28a1.21 1.21 0 0 0-1.72 0L2.36 18.64a1.21 1.21 0 0 0 0 1.72l1.28 1.28a1.2 1.2 0 0 0 1.72 0L21.64 5.36a1.2 1.2 0 0 0 0-1.72",
    "m14 7 3 3",
    "M5 6v4",
    "M19 14v4",
    "M10 2v2",
    "M7 8H3",
    "M21 16h-4",
    "M11 3H9",
];

const SUCCESS_PATHS: &[&str] = &["M20 6L9 17l-5-5"];

const ERROR_PATHS: &[&str] = &[
    "M12 16h.01",
    "M12 8v4",
    "M15.312 2a2 2 0 0 1 1.414.586l4.688 4.688A2 2 0 0 1 22 8.688v6.624a2 2 0 0 1-.586 1.414l-4.688 4.688a2 2 0 0 1-1.414.586H8.688a2 2 0 0 1-1.414-.586l-4.688-4.688A2 2 0 0 1 2 15.312V8.688a2 2 0 0 1 .586-1.414l4.688-4.688A2 2 0 0 1 8.688 2z",
];

/// The icon currently drawn inside a button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    Image { src: String },
    Glyph { glyph: Glyph, color: String },
    Loader,
    Success,
    Failure,
}

impl Icon {
    /// Icon for a state. `hovered` only affects the glyph color.
    pub fn for_state(visual: &ButtonVisual, state: &ButtonState, hovered: bool) -> Self {
        match state {
            ButtonState::Busy => Self::Loader,
            ButtonState::Success => Self::Success,
            ButtonState::Error(_) => Self::Failure,
            _ => match &visual.image {
                Some(src) => Self::Image { src: src.clone() },
                None => {
                    let color = if !state.is_interactive() {
                        &visual.colors.disabled
                    } else if hovered {
                        &visual.colors.hover
                    } else {
                        &visual.colors.normal
                    };
                    Self::Glyph {
                        glyph: visual.glyph,
                        color: color.clone(),
                    }
                }
            },
        }
    }
}

/// Create a detached, unstyled button for a site.
pub fn create_button(doc: &mut Document, site: &SiteDescriptor) -> Result<NodeId, DomError> {
    let button = doc.create_element("button");
    doc.set_attribute(button, "type", "button")?;
    doc.set_attribute(button, "class", BUTTON_CLASS)?;
    doc.set_attribute(
        button,
        "data-position",
        site.button_container.insert_position.dom_name(),
    )?;
    doc.set_attribute(button, OWNED_ATTRIBUTE, "button")?;
    Ok(button)
}

/// Inline style for a state: base rules, then hover or disabled rules.
pub fn style_for(site: &SiteDescriptor, state: &ButtonState, hovered: bool) -> StyleRules {
    let styles = &site.styles;
    if !state.is_interactive() {
        styles.base.merged(&styles.disabled)
    } else if hovered {
        styles.base.merged(&styles.hover)
    } else {
        styles.base.clone()
    }
}

/// Bring the button's attributes and icon in line with `state`.
///
/// `drawn` remembers the icon already in the DOM between calls.
pub fn render(
    doc: &mut Document,
    button: NodeId,
    site: &SiteDescriptor,
    state: &ButtonState,
    hovered: bool,
    drawn: &mut Option<Icon>,
) -> Result<(), DomError> {
    let disabled = !state.is_interactive();

    doc.set_attribute(button, "title", state.tooltip())?;
    doc.set_attribute(button, "data-state", state.name())?;
    doc.set_attribute(button, "style", &style_for(site, state, hovered).to_css())?;
    if disabled {
        doc.set_attribute(button, "disabled", "")?;
        doc.set_attribute(button, "aria-disabled", "true")?;
        doc.add_class(button, "disabled")?;
    } else {
        doc.remove_attribute(button, "disabled")?;
        doc.remove_attribute(button, "aria-disabled")?;
        doc.remove_class(button, "disabled")?;
    }

    let icon = Icon::for_state(&site.visual, state, hovered);
    if drawn.as_ref() != Some(&icon) || doc.children(button).is_empty() {
        let node = build_icon(doc, &site.visual, &icon)?;
        doc.replace_children(button, vec![node])?;
        *drawn = Some(icon);
    }
    Ok(())
}

fn build_icon(doc: &mut Document, visual: &ButtonVisual, icon: &Icon) -> Result<NodeId, DomError> {
    let width = visual.icon_width().to_string();
    let height = visual.icon_size.to_string();
    match icon {
        Icon::Image { src } => {
            let img = doc.create_element("img");
            doc.set_attribute(img, "class", "button-image")?;
            doc.set_attribute(img, "src", src)?;
            doc.set_attribute(img, "width", &width)?;
            doc.set_attribute(img, "height", &height)?;
            doc.set_attribute(img, "alt", "")?;
            Ok(img)
        }
        Icon::Glyph { glyph, color } => {
            let paths = match glyph {
                Glyph::Sparkles => SPARKLES_PATHS,
                Glyph::Wand => WAND_PATHS,
            };
            let svg = build_svg(doc, paths, color, &width, &height)?;
            doc.set_attribute(svg, "class", "button-image")?;
            doc.set_attribute(svg, "data-glyph", glyph.name())?;
            Ok(svg)
        }
        Icon::Loader => {
            let wrapper = image_container(doc)?;
            let spinner = doc.create_element("span");
            doc.set_attribute(spinner, "class", "prompt-assist-loader")?;
            doc.append_child(wrapper, spinner)?;
            Ok(wrapper)
        }
        Icon::Success | Icon::Failure => {
            let (paths, color) = if *icon == Icon::Success {
                (SUCCESS_PATHS, SUCCESS_COLOR)
            } else {
                (ERROR_PATHS, ERROR_COLOR)
            };
            let wrapper = image_container(doc)?;
            let svg = build_svg(doc, paths, color, &width, &height)?;
            doc.append_child(wrapper, svg)?;
            Ok(wrapper)
        }
    }
}

fn image_container(doc: &mut Document) -> Result<NodeId, DomError> {
    let wrapper = doc.create_element("div");
    doc.set_attribute(wrapper, "class", "button-image-container")?;
    Ok(wrapper)
}

fn build_svg(
    doc: &mut Document,
    paths: &[&str],
    stroke: &str,
    width: &str,
    height: &str,
) -> Result<NodeId, DomError> {
    let svg = doc.create_element("svg");
    for (name, value) in [
        ("xmlns", SVG_NS),
        ("width", width),
        ("height", height),
        ("viewBox", "0 0 24 24"),
        ("fill", "none"),
        ("stroke", stroke),
        ("stroke-width", "2"),
        ("stroke-linecap", "round"),
        ("stroke-linejoin", "round"),
    ] {
        doc.set_attribute(svg, name, value)?;
    }
    for d in paths {
        let path = doc.create_element("path");
        doc.set_attribute(path, "d", d)?;
        doc.append_child(svg, path)?;
    }
    Ok(svg)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
