use promptassist_dom::InsertPosition;

use super::*;
use crate::site::{ButtonContainer, ButtonStyles, ButtonVisual, UrlPattern};

fn site(pattern: &str, name: &str) -> SiteDescriptor {
    SiteDescriptor {
        pattern: UrlPattern::parse(pattern).unwrap(),
        name: Some(name.to_string()),
        input_selectors: vec!["textarea".to_string()],
        button_container: ButtonContainer {
            selector: ".toolbar".to_string(),
            insert_position: InsertPosition::InsideEnd,
        },
        visual: ButtonVisual::default(),
        styles: ButtonStyles::default(),
    }
}

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[test]
fn test_resolve_single_entry() {
    let registry = SiteRegistry::new(vec![site("example.com", "example")]);
    let found = registry.resolve(&url("https://example.com/chat")).unwrap();
    assert_eq!(found.display_name(), "example");
}

#[test]
fn test_resolve_none_for_unsupported_site() {
    let registry = SiteRegistry::new(vec![site("example.com", "example")]);
    assert!(registry.resolve(&url("https://other.org/")).is_none());
}

#[test]
fn test_first_registered_wins() {
    let registry = SiteRegistry::new(vec![
        site("example.com", "broad"),
        site("example.com/chat", "specific"),
    ]);
    let found = registry.resolve(&url("https://example.com/chat")).unwrap();
    assert_eq!(found.display_name(), "broad");

    let reversed = SiteRegistry::new(vec![
        site("example.com/chat", "specific"),
        site("example.com", "broad"),
    ]);
    assert_eq!(
        reversed.resolve(&url("https://example.com/chat")).unwrap().display_name(),
        "specific"
    );
    assert_eq!(
        reversed.resolve(&url("https://example.com/settings")).unwrap().display_name(),
        "broad"
    );
}

#[test]
fn test_resolve_is_deterministic() {
    let registry = SiteRegistry::new(vec![site("a.com", "a"), site("b.com", "b")]);
    let target = url("https://b.com/x");
    let first = registry.resolve(&target).unwrap();
    for _ in 0..5 {
        let again = registry.resolve(&target).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
}

#[test]
fn test_builtin_registry() {
    let registry = SiteRegistry::builtin();
    assert_eq!(registry.len(), 1);
    let found = registry.resolve(&url("https://demo.chat-sdk.dev/")).unwrap();
    assert_eq!(found.input_selectors[0], "#multimodal-input");
    assert_eq!(found.button_container.insert_position, InsertPosition::InsideStart);
}

#[test]
fn test_from_config_appends_after_builtin() {
    let config = Config {
        sites: vec![site("example.com", "example")],
        ..Config::default()
    };
    let registry = SiteRegistry::from_config(&config);
    assert_eq!(registry.len(), 2);
    let names: Vec<_> = registry.iter().map(|s| s.display_name().to_string()).collect();
    assert_eq!(names, vec!["Chat SDK demo".to_string(), "example".to_string()]);
}

#[test]
fn test_from_config_replace_builtin() {
    let config = Config {
        replace_builtin: true,
        sites: vec![site("demo.chat-sdk.dev", "override")],
        ..Config::default()
    };
    let registry = SiteRegistry::from_config(&config);
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.resolve(&url("https://demo.chat-sdk.dev/")).unwrap().display_name(),
        "override"
    );
}

#[test]
fn test_resolve_str_invalid_url() {
    let registry = SiteRegistry::builtin();
    assert!(matches!(
        registry.resolve_str("not a url"),
        Err(ConfigError::InvalidUrl(_))
    ));
    assert!(registry.resolve_str("https://nowhere.test/").unwrap().is_none());
}

#[test]
fn test_empty_registry() {
    let registry = SiteRegistry::default();
    assert!(registry.is_empty());
    assert!(registry.resolve(&url("https://example.com/")).is_none());
}
