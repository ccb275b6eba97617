use super::*;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn test_pattern_host_only() {
    let pattern = UrlPattern::parse("example.com").unwrap();
    assert_eq!(pattern.host(), "example.com");
    assert!(pattern.path().is_none());
    assert!(pattern.matches_url(&url("https://example.com/chat")));
    assert!(pattern.matches_url(&url("https://chat.example.com/")));
    assert!(!pattern.matches_url(&url("https://example.org/")));
}

#[test]
fn test_pattern_trailing_wildcard_is_host_only() {
    let pattern = UrlPattern::parse("demo.chat-sdk.dev/*").unwrap();
    assert_eq!(pattern.host(), "demo.chat-sdk.dev");
    assert!(pattern.path().is_none());
    assert!(pattern.matches_url(&url("https://demo.chat-sdk.dev/chat/123")));
    assert_eq!(pattern.as_str(), "demo.chat-sdk.dev/*");
}

#[test]
fn test_pattern_with_path() {
    let pattern = UrlPattern::parse("example.com/chat").unwrap();
    assert_eq!(pattern.path(), Some("/chat"));
    assert!(pattern.matches_url(&url("https://example.com/chat")));
    assert!(pattern.matches_url(&url("https://example.com/chat/42")));
    assert!(!pattern.matches_url(&url("https://example.com/settings")));
}

#[test]
fn test_pattern_strips_scheme() {
    let pattern = UrlPattern::parse("https://Example.com/").unwrap();
    assert_eq!(pattern.host(), "example.com");
    assert!(pattern.path().is_none());
}

#[test]
fn test_pattern_empty_host_rejected() {
    assert!(UrlPattern::parse("").is_err());
    assert!(UrlPattern::parse("/*").is_err());
    assert!(UrlPattern::parse("/chat").is_err());
}

#[test]
fn test_pattern_url_without_host_never_matches() {
    let pattern = UrlPattern::parse("example.com").unwrap();
    assert!(!pattern.matches_url(&url("file:///tmp/example.com")));
}

#[test]
fn test_pattern_shadows() {
    let host = UrlPattern::parse("example.com").unwrap();
    let sub = UrlPattern::parse("chat.example.com").unwrap();
    let path = UrlPattern::parse("example.com/chat").unwrap();
    let deeper = UrlPattern::parse("example.com/chat/new").unwrap();

    assert!(host.shadows(&sub));
    assert!(host.shadows(&path));
    assert!(path.shadows(&deeper));
    assert!(!path.shadows(&host));
    assert!(!sub.shadows(&host));
    assert!(!deeper.shadows(&path));
}

#[test]
fn test_style_rules_parse_css() {
    let rules = StyleRules::parse_css("padding: 7px; border: none;; bogus; color:");
    assert_eq!(rules.len(), 2);
    assert_eq!(rules.get("padding"), Some("7px"));
    assert_eq!(rules.get("BORDER"), Some("none"));
    assert_eq!(rules.to_css(), "padding: 7px; border: none");
}

#[test]
fn test_style_rules_keep_order_and_replace_in_place() {
    let mut rules = StyleRules::parse_css("a: 1; b: 2");
    rules.set("a", "3");
    assert_eq!(rules.to_css(), "a: 3; b: 2");
}

#[test]
fn test_style_rules_merged() {
    let base = StyleRules::parse_css("cursor: pointer; background: none");
    let hover = StyleRules::parse_css("background: #18181B");
    let merged = base.merged(&hover);
    assert_eq!(merged.to_css(), "cursor: pointer; background: #18181B");
    assert_eq!(base.get("background"), Some("none"));
}

#[test]
fn test_style_rules_deserialize_from_string_and_table() {
    #[derive(Deserialize)]
    struct Holder {
        css: StyleRules,
        table: StyleRules,
    }

    let holder: Holder = toml::from_str(
        r##"
            css = "padding: 7px; border: none"
            [table]
            padding = "4px"
            "##,
    )
    .unwrap();
    assert_eq!(holder.css.get("border"), Some("none"));
    assert_eq!(holder.table.get("padding"), Some("4px"));
}

#[test]
fn test_descriptor_minimal_defaults() {
    let site: SiteDescriptor = toml::from_str(
        r##"
            pattern = "example.com"
            input_selectors = ["textarea"]
            [button_container]
            selector = ".toolbar"
            insert_position = "inside-end"
        "##,
    )
    .unwrap();

    assert_eq!(site.display_name(), "example.com");
    assert_eq!(site.visual.icon_size, 24);
    assert_eq!(site.visual.aspect_ratio, 1.0);
    assert_eq!(site.visual.glyph, Glyph::Sparkles);
    assert_eq!(site.visual.colors.disabled, "#9ca3af");
    assert_eq!(site.styles.hover.get("background-color"), Some("#18181B"));
    assert_eq!(site.styles.disabled.get("opacity"), Some("0.5"));
    assert_eq!(site.button_container.insert_position, InsertPosition::InsideEnd);
}

#[test]
fn test_descriptor_accepts_dom_insert_names() {
    let site: SiteDescriptor = toml::from_str(
        r##"
            pattern = "example.com"
            input_selectors = ["textarea"]
            button_container = { selector = ".toolbar", insert_position = "afterbegin" }
        "##,
    )
    .unwrap();
    assert_eq!(site.button_container.insert_position, InsertPosition::InsideStart);
}

#[test]
fn test_descriptor_requires_insert_position() {
    let result: Result<SiteDescriptor, _> = toml::from_str(
        r##"
            pattern = "example.com"
            input_selectors = ["textarea"]
            button_container = { selector = ".toolbar" }
        "##,
    );
    assert!(result.is_err());
}

#[test]
fn test_descriptor_requires_selectors() {
    let result: Result<SiteDescriptor, _> = toml::from_str(
        r##"
            pattern = "example.com"
            button_container = { selector = ".toolbar", insert_position = "inside-end" }
        "##,
    );
    assert!(result.is_err());
}

#[test]
fn test_icon_width_uses_aspect_ratio() {
    let visual = ButtonVisual {
        icon_size: 20,
        aspect_ratio: 1.5,
        ..ButtonVisual::default()
    };
    assert_eq!(visual.icon_width(), 30);
}

#[test]
fn test_pattern_serializes_as_written() {
    let pattern = UrlPattern::parse("demo.chat-sdk.dev/*").unwrap();
    let json = serde_json::to_string(&pattern).unwrap();
    assert_eq!(json, "\"demo.chat-sdk.dev/*\"");
}
