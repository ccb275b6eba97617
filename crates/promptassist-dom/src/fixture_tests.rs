use super::*;

const PAGE: &str = r#"{
    "url": "https://example.com/chat",
    "body": [
        { "tag": "form", "attrs": { "class": "composer" }, "children": [
            { "tag": "textarea", "attrs": { "id": "prompt" }, "value": "hello",
              "rect": [0, 0, 600, 80] },
            { "tag": "div", "attrs": { "class": "toolbar" }, "children": [
                { "tag": "button", "text": "Send" }
            ]},
            { "text": "trailing" }
        ]}
    ]
}"#;

#[test]
fn test_fixture_builds_document() {
    let doc = PageFixture::from_json(PAGE).unwrap().into_document().unwrap();
    let textarea = doc.query_selector(doc.body(), "#prompt").unwrap().unwrap();
    assert_eq!(doc.value(textarea), Some("hello"));
    assert_eq!(doc.rect(textarea), Some(BoundingBox::new(0.0, 0.0, 600.0, 80.0)));

    let button = doc.query_selector(doc.body(), ".toolbar > button").unwrap().unwrap();
    assert_eq!(doc.text_content(button), "Send");

    let form = doc.query_selector(doc.body(), "form.composer").unwrap().unwrap();
    assert!(doc.text_content(form).ends_with("trailing"));
}

#[test]
fn test_fixture_discards_load_mutations() {
    let mut doc = PageFixture::from_json(PAGE).unwrap().into_document().unwrap();
    assert!(doc.take_mutations().is_empty());
}

#[test]
fn test_fixture_rejects_node_without_tag_or_text() {
    let json = r#"{ "url": "https://example.com/", "body": [ {} ] }"#;
    let err = PageFixture::from_json(json).unwrap().into_document().unwrap_err();
    assert!(matches!(err, DomError::Fixture(_)));
}

#[test]
fn test_fixture_value_on_non_field_fails() {
    let json = r#"{ "url": "https://example.com/", "body": [ { "tag": "div", "value": "x" } ] }"#;
    let err = PageFixture::from_json(json).unwrap().into_document().unwrap_err();
    assert!(matches!(err, DomError::NotValueBearing(_)));
}

#[test]
fn test_fixture_bad_json() {
    assert!(matches!(PageFixture::from_json("{"), Err(DomError::Fixture(_))));
}
