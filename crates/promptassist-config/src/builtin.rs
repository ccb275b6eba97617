//! Built-in site descriptors.

use promptassist_dom::InsertPosition;

use crate::site::{
    ButtonContainer, ButtonStyles, ButtonVisual, SiteDescriptor, StyleRules, UrlPattern,
};

/// Descriptors shipped with the binary, in registration order.
pub(crate) fn builtin_sites() -> Vec<SiteDescriptor> {
    let mut sites = Vec::new();
    if let Ok(pattern) = UrlPattern::parse("demo.chat-sdk.dev/*") {
        sites.push(chat_sdk_demo(pattern));
    }
    sites
}

fn chat_sdk_demo(pattern: UrlPattern) -> SiteDescriptor {
    SiteDescriptor {
        pattern,
        name: Some("Chat SDK demo".to_string()),
        input_selectors: vec![
            "#multimodal-input".to_string(),
            r#"textarea[placeholder*="Send a message..."]"#.to_string(),
            r#"textarea[rows="2"]"#.to_string(),
        ],
        button_container: ButtonContainer {
            selector: ".absolute.bottom-0.p-2.w-fit.flex.flex-row.justify-start".to_string(),
            insert_position: InsertPosition::InsideStart,
        },
        visual: ButtonVisual::default(),
        styles: ButtonStyles {
            base: StyleRules::parse_css(
                "padding: 7px; border-radius: 6px; border: none; height: fit-content; \
                 display: flex; align-items: center; justify-content: center; \
                 background: none; cursor: pointer; margin-right: 4px",
            ),
            ..ButtonStyles::default()
        },
    }
}
