use super::*;

fn doc() -> Document {
    Document::parse_url("https://example.com/chat").unwrap()
}

#[test]
fn test_new_document_skeleton() {
    let doc = doc();
    assert_eq!(doc.tag(doc.root()), Some("html"));
    assert_eq!(doc.tag(doc.head()), Some("head"));
    assert_eq!(doc.tag(doc.body()), Some("body"));
    assert_eq!(doc.parent(doc.body()), Some(doc.root()));
    assert_eq!(doc.url().host_str(), Some("example.com"));
}

#[test]
fn test_parse_url_invalid() {
    assert!(matches!(
        Document::parse_url("not a url"),
        Err(DomError::InvalidUrl(_))
    ));
}

#[test]
fn test_append_records_mutation_when_connected() {
    let mut doc = doc();
    let div = doc.create_element("div");
    let span = doc.create_element("span");

    // Detached edits are not observable.
    doc.append_child(div, span).unwrap();
    assert!(!doc.has_pending_mutations());

    let body = doc.body();
    doc.append_child(body, div).unwrap();
    let records = doc.take_mutations();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].target, body);
    assert_eq!(records[0].added_nodes(), &[div]);
    assert!(doc.is_connected(span));
}

#[test]
fn test_append_moves_node() {
    let mut doc = doc();
    let body = doc.body();
    let a = doc.create_element("div");
    let b = doc.create_element("div");
    let child = doc.create_element("p");
    doc.append_child(body, a).unwrap();
    doc.append_child(body, b).unwrap();
    doc.append_child(a, child).unwrap();
    doc.take_mutations();

    doc.append_child(b, child).unwrap();
    assert_eq!(doc.children(a), &[] as &[NodeId]);
    assert_eq!(doc.children(b), &[child]);

    let records = doc.take_mutations();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].kind,
        MutationKind::ChildList {
            added: vec![],
            removed: vec![child]
        }
    );
    assert_eq!(records[1].added_nodes(), &[child]);
}

#[test]
fn test_append_rejects_cycle() {
    let mut doc = doc();
    let outer = doc.create_element("div");
    let inner = doc.create_element("div");
    doc.append_child(outer, inner).unwrap();

    let err = doc.append_child(inner, outer).unwrap_err();
    assert!(matches!(err, DomError::HierarchyRequest { .. }));
}

#[test]
fn test_append_to_text_node_fails() {
    let mut doc = doc();
    let text = doc.create_text("hi");
    let div = doc.create_element("div");
    assert_eq!(
        doc.append_child(text, div).unwrap_err(),
        DomError::NotAnElement(text)
    );
}

#[test]
fn test_insert_adjacent_positions() {
    let mut doc = doc();
    let body = doc.body();
    let container = doc.create_element("div");
    let existing = doc.create_element("span");
    doc.append_child(body, container).unwrap();
    doc.append_child(container, existing).unwrap();

    let start = doc.create_element("b");
    let end = doc.create_element("i");
    let before = doc.create_element("em");
    let after = doc.create_element("u");
    doc.insert_adjacent(container, InsertPosition::InsideStart, start).unwrap();
    doc.insert_adjacent(container, InsertPosition::InsideEnd, end).unwrap();
    doc.insert_adjacent(container, InsertPosition::OutsideBefore, before).unwrap();
    doc.insert_adjacent(container, InsertPosition::OutsideAfter, after).unwrap();

    assert_eq!(doc.children(container), &[start, existing, end]);
    assert_eq!(doc.children(body), &[before, container, after]);
}

#[test]
fn test_insert_adjacent_outside_requires_parent() {
    let mut doc = doc();
    let detached = doc.create_element("div");
    let node = doc.create_element("span");
    assert_eq!(
        doc.insert_adjacent(detached, InsertPosition::OutsideAfter, node).unwrap_err(),
        DomError::NoParent(detached)
    );
}

#[test]
fn test_remove_disconnects_subtree() {
    let mut doc = doc();
    let body = doc.body();
    let div = doc.create_element("div");
    let span = doc.create_element("span");
    doc.append_child(body, div).unwrap();
    doc.append_child(div, span).unwrap();

    doc.remove(div).unwrap();
    assert!(!doc.is_connected(div));
    assert!(!doc.is_connected(span));
    assert_eq!(doc.parent(span), Some(div));
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut doc = doc();
    let div = doc.create_element("div");
    let p1 = doc.create_element("p");
    let p2 = doc.create_element("p");
    let t1 = doc.create_text("Hello");
    let t2 = doc.create_text("World");
    doc.append_child(div, p1).unwrap();
    doc.append_child(div, p2).unwrap();
    doc.append_child(p1, t1).unwrap();
    doc.append_child(p2, t2).unwrap();

    assert_eq!(doc.text_content(div), "HelloWorld");
    assert_eq!(doc.text_content(t2), "World");
}

#[test]
fn test_set_text_content_replaces_children() {
    let mut doc = doc();
    let body = doc.body();
    let div = doc.create_element("div");
    doc.append_child(body, div).unwrap();
    doc.set_text_content(div, "one").unwrap();
    doc.take_mutations();

    doc.set_text_content(div, "two").unwrap();
    assert_eq!(doc.text_content(div), "two");
    let records = doc.take_mutations();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_child_list());

    doc.set_text_content(div, "").unwrap();
    assert!(doc.children(div).is_empty());
}

#[test]
fn test_character_data_mutation() {
    let mut doc = doc();
    let body = doc.body();
    let text = doc.create_text("a");
    doc.append_child(body, text).unwrap();
    doc.take_mutations();

    doc.set_character_data(text, "b").unwrap();
    let records = doc.take_mutations();
    assert_eq!(records[0].kind, MutationKind::CharacterData);

    doc.set_character_data(text, "b").unwrap();
    assert!(!doc.has_pending_mutations());
}

#[test]
fn test_attributes_and_classes() {
    let mut doc = doc();
    let body = doc.body();
    let button = doc.create_element("BUTTON");
    doc.append_child(body, button).unwrap();
    doc.take_mutations();

    assert_eq!(doc.tag(button), Some("button"));
    doc.set_attribute(button, "Title", "Improve").unwrap();
    assert_eq!(doc.attribute(button, "title"), Some("Improve"));

    doc.add_class(button, "prompt-assist-button").unwrap();
    doc.add_class(button, "disabled").unwrap();
    doc.add_class(button, "disabled").unwrap();
    assert_eq!(doc.class_list(button), vec!["prompt-assist-button", "disabled"]);

    doc.remove_class(button, "disabled").unwrap();
    assert!(!doc.has_class(button, "disabled"));
    assert!(doc.has_class(button, "prompt-assist-button"));

    // title, class x3 (add, add, remove); the duplicate add is a no-op
    assert_eq!(doc.take_mutations().len(), 4);

    doc.set_attribute(button, "title", "Improve").unwrap();
    assert!(!doc.has_pending_mutations());

    doc.remove_attribute(button, "title").unwrap();
    assert!(!doc.has_attribute(button, "title"));
    assert_eq!(doc.take_mutations().len(), 1);
}

#[test]
fn test_form_value_has_no_mutation() {
    let mut doc = doc();
    let body = doc.body();
    let textarea = doc.create_element("textarea");
    let div = doc.create_element("div");
    doc.append_child(body, textarea).unwrap();
    doc.take_mutations();

    assert_eq!(doc.value(textarea), Some(""));
    doc.set_value(textarea, "hello").unwrap();
    assert_eq!(doc.value(textarea), Some("hello"));
    assert!(!doc.has_pending_mutations());

    assert!(!doc.has_value(div));
    assert_eq!(doc.set_value(div, "x").unwrap_err(), DomError::NotValueBearing(div));
}

#[test]
fn test_content_editable() {
    let mut doc = doc();
    let div = doc.create_element("div");
    assert!(!doc.is_content_editable(div));
    doc.set_attribute(div, "contenteditable", "true").unwrap();
    assert!(doc.is_content_editable(div));
    doc.set_attribute(div, "contenteditable", "false").unwrap();
    assert!(!doc.is_content_editable(div));
}

#[test]
fn test_element_from_point_prefers_topmost() {
    let mut doc = doc();
    let body = doc.body();
    let outer = doc.create_element("div");
    let inner = doc.create_element("button");
    doc.append_child(body, outer).unwrap();
    doc.append_child(outer, inner).unwrap();
    doc.set_rect(outer, BoundingBox::new(0.0, 0.0, 500.0, 500.0)).unwrap();
    doc.set_rect(inner, BoundingBox::new(100.0, 100.0, 50.0, 50.0)).unwrap();

    assert_eq!(doc.element_from_point(120.0, 120.0), Some(inner));
    assert_eq!(doc.element_from_point(10.0, 10.0), Some(outer));
    assert_eq!(doc.element_from_point(900.0, 900.0), None);
}

#[test]
fn test_queries() {
    let mut doc = doc();
    let body = doc.body();
    let form = doc.create_element("form");
    let textarea = doc.create_element("textarea");
    let toolbar = doc.create_element("div");
    doc.append_child(body, form).unwrap();
    doc.append_child(form, textarea).unwrap();
    doc.append_child(form, toolbar).unwrap();
    doc.set_attribute(toolbar, "class", "toolbar actions").unwrap();

    let found = doc.query_selector_all(body, "textarea, .toolbar").unwrap();
    assert_eq!(found, vec![textarea, toolbar]);
    assert_eq!(doc.query_selector(body, ".actions").unwrap(), Some(toolbar));

    let forms = SelectorList::parse("form").unwrap();
    assert_eq!(doc.closest(textarea, &forms), Some(form));
    assert_eq!(doc.closest(form, &forms), Some(form));
    assert!(doc.query_selector_all(body, "[").is_err());
}

#[test]
fn test_events_queue() {
    let mut doc = doc();
    let body = doc.body();
    doc.dispatch_event(body, EventKind::Click);
    doc.dispatch_synthetic(body, EventKind::Input);

    let events = doc.take_events();
    assert_eq!(events.len(), 2);
    assert!(!events[0].synthetic);
    assert!(events[1].synthetic);
    assert!(!doc.has_pending_events());
}

#[test]
fn test_to_markup() {
    let mut doc = doc();
    let body = doc.body();
    let textarea = doc.create_element("textarea");
    let img = doc.create_element("img");
    doc.append_child(body, textarea).unwrap();
    doc.append_child(body, img).unwrap();
    doc.set_attribute(textarea, "id", "prompt").unwrap();
    doc.set_value(textarea, "a < b").unwrap();
    doc.set_attribute(img, "alt", "say \"hi\"").unwrap();

    assert_eq!(
        doc.to_markup(body),
        "<body><textarea id=\"prompt\">a &lt; b</textarea><img alt=\"say &quot;hi&quot;\"></body>"
    );
}
