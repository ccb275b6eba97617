use promptassist_dom::PageFixture;

use super::*;

fn page(json: &str) -> Document {
    PageFixture::from_json(json).unwrap().into_document().unwrap()
}

fn selector(s: &str) -> SelectorList {
    SelectorList::parse(s).unwrap()
}

fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.query_selector(doc.root(), &format!("#{}", id))
        .unwrap()
        .unwrap()
}

#[test]
fn test_find_inputs_unions_selectors() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "textarea", "attrs": {"id": "a", "rows": "2"}},
            {"tag": "textarea", "attrs": {"id": "b", "class": "hidden"}},
            {"tag": "div", "attrs": {"id": "c", "contenteditable": "true"}}
        ]}"#,
    );
    let selectors = SiteSelectors {
        inputs: vec![
            selector(r#"textarea[rows="2"]"#),
            selector("textarea"),
            selector("[contenteditable]"),
        ],
        container: selector(".toolbar"),
    };
    let found = find_inputs(&doc, &selectors);
    assert_eq!(
        found,
        vec![by_id(&doc, "a"), by_id(&doc, "b"), by_id(&doc, "c")]
    );
}

#[test]
fn test_find_inputs_skips_owned_nodes() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "textarea", "attrs": {"id": "a"}},
            {"tag": "div", "attrs": {"data-prompt-assist": "container"}, "children": [
                {"tag": "textarea", "attrs": {"id": "mine"}}
            ]}
        ]}"#,
    );
    let selectors = SiteSelectors {
        inputs: vec![selector("textarea")],
        container: selector(".toolbar"),
    };
    assert_eq!(find_inputs(&doc, &selectors), vec![by_id(&doc, "a")]);
}

#[test]
fn test_container_ancestor_step() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "attrs": {"id": "outer", "class": "box"}, "children": [
                {"tag": "div", "attrs": {"id": "inner", "class": "box"}, "children": [
                    {"tag": "textarea", "attrs": {"id": "input"}}
                ]}
            ]}
        ]}"#,
    );
    let input = by_id(&doc, "input");
    let hit = find_existing_container(&doc, input, &selector(".box")).unwrap();
    assert_eq!(hit.node, by_id(&doc, "inner"));
    assert_eq!(hit.strategy, ContainerStrategy::Ancestor);
}

#[test]
fn test_container_parent_step() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "children": [
                {"tag": "textarea", "attrs": {"id": "input"}},
                {"tag": "div", "children": [
                    {"tag": "div", "attrs": {"id": "toolbar", "class": "toolbar"}}
                ]}
            ]}
        ]}"#,
    );
    let hit = find_existing_container(&doc, by_id(&doc, "input"), &selector(".toolbar")).unwrap();
    assert_eq!(hit.node, by_id(&doc, "toolbar"));
    assert_eq!(hit.strategy, ContainerStrategy::Parent);
}

#[test]
fn test_container_chat_area_step() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "attrs": {"class": "toolbar", "id": "far"}},
            {"tag": "form", "children": [
                {"tag": "div", "children": [
                    {"tag": "textarea", "attrs": {"id": "input"}}
                ]},
                {"tag": "div", "attrs": {"class": "toolbar", "id": "near"}}
            ]}
        ]}"#,
    );
    let hit = find_existing_container(&doc, by_id(&doc, "input"), &selector(".toolbar")).unwrap();
    assert_eq!(hit.node, by_id(&doc, "near"));
    assert_eq!(hit.strategy, ContainerStrategy::ChatArea);
}

#[test]
fn test_container_nearest_step_uses_geometry() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "attrs": {"class": "toolbar", "id": "top"}, "rect": [0, 0, 100, 20]},
            {"tag": "div", "children": [
                {"tag": "textarea", "attrs": {"id": "input"}, "rect": [0, 500, 600, 80]}
            ]},
            {"tag": "div", "attrs": {"class": "toolbar", "id": "bottom"}, "rect": [0, 590, 600, 30]}
        ]}"#,
    );
    let hit = find_existing_container(&doc, by_id(&doc, "input"), &selector(".toolbar")).unwrap();
    assert_eq!(hit.node, by_id(&doc, "bottom"));
    assert_eq!(hit.strategy, ContainerStrategy::Nearest);
}

#[test]
fn test_container_nearest_without_geometry_takes_first() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "attrs": {"class": "toolbar", "id": "first"}},
            {"tag": "div", "children": [{"tag": "textarea", "attrs": {"id": "input"}}]},
            {"tag": "div", "attrs": {"class": "toolbar", "id": "second"}}
        ]}"#,
    );
    let hit = find_existing_container(&doc, by_id(&doc, "input"), &selector(".toolbar")).unwrap();
    assert_eq!(hit.node, by_id(&doc, "first"));
}

#[test]
fn test_container_hit_test_step() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "attrs": {"class": "composer"}, "rect": [0, 0, 800, 200], "children": [
                {"tag": "div", "children": [
                    {"tag": "textarea", "attrs": {"id": "input"}, "rect": [0, 100, 600, 80]}
                ]},
                {"tag": "div", "attrs": {"id": "actions", "class": "send-actions"}, "rect": [600, 100, 200, 80], "children": [
                    {"tag": "button", "attrs": {"id": "send"}, "rect": [610, 140, 40, 40]}
                ]}
            ]}
        ]}"#,
    );
    let hit = find_existing_container(&doc, by_id(&doc, "input"), &selector(".missing")).unwrap();
    assert_eq!(hit.node, by_id(&doc, "actions"));
    assert_eq!(hit.strategy, ContainerStrategy::HitTest);
}

#[test]
fn test_container_hit_test_ignores_body_and_input() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "textarea", "attrs": {"id": "input", "class": "input-wrapper"}, "rect": [0, 0, 600, 80]}
        ]}"#,
    );
    assert!(find_existing_container(&doc, by_id(&doc, "input"), &selector(".missing")).is_none());
}

#[test]
fn test_container_synthesized_as_last_child() {
    let mut doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "attrs": {"id": "wrap"}, "children": [
                {"tag": "textarea", "attrs": {"id": "input"}},
                {"tag": "span"}
            ]}
        ]}"#,
    );
    let input = by_id(&doc, "input");
    let wrap = by_id(&doc, "wrap");
    let hit = find_container(&mut doc, input, &selector(".missing")).unwrap();
    assert_eq!(hit.strategy, ContainerStrategy::Synthesized);
    assert_eq!(doc.children(wrap).last(), Some(&hit.node));
    assert!(is_owned(&doc, hit.node));

    // A synthesized container is never offered as a real one.
    assert!(
        find_existing_container(&doc, input, &selector("div")).is_some_and(|h| h.node != hit.node)
    );
}

#[test]
fn test_container_detached_input_fails() {
    let mut doc = page(r#"{"url": "https://example.com/"}"#);
    let input = doc.create_element("textarea");
    assert!(find_container(&mut doc, input, &selector(".missing")).is_err());
}

#[test]
fn test_watch_scope() {
    let doc = page(
        r#"{"url": "https://example.com/", "body": [
            {"tag": "div", "attrs": {"class": "chat-area", "id": "area"}, "children": [
                {"tag": "textarea", "attrs": {"id": "input"}}
            ]},
            {"tag": "textarea", "attrs": {"id": "loose"}}
        ]}"#,
    );
    assert_eq!(watch_scope(&doc, by_id(&doc, "input")), by_id(&doc, "area"));
    assert_eq!(watch_scope(&doc, by_id(&doc, "loose")), doc.body());
}

#[test]
fn test_compile_reports_site() {
    use promptassist_config::SiteRegistry;

    let registry = SiteRegistry::builtin();
    let site = registry.iter().next().unwrap();
    let compiled = SiteSelectors::compile(site).unwrap();
    assert_eq!(compiled.inputs.len(), 3);

    let mut broken = site.clone();
    broken.input_selectors.push("textarea:focus".to_string());
    let err = SiteSelectors::compile(&broken).unwrap_err();
    assert!(err.to_string().contains("Chat SDK demo"));
}
