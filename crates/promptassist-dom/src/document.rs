//! Arena-backed document.
//!
//! Nodes are never freed: removing a node only detaches it, so handles held by
//! the overlay stay valid and simply report `is_connected() == false`.

use selectors::OpaqueElement;
use url::Url;

use crate::dom_types::{
    BoundingBox, DomEvent, EventKind, InsertPosition, MutationKind, MutationRecord, NodeId,
};
use crate::error::DomError;
use crate::selector::SelectorList;

/// Tags whose text lives in a scalar form value instead of child nodes.
const VALUE_TAGS: &[&str] = &["textarea", "input", "select"];

/// Tags rendered without a closing tag.
const VOID_TAGS: &[&str] = &["br", "img", "input", "hr", "meta", "link"];

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    rect: Option<BoundingBox>,
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A page: `html > head + body` plus whatever the host builds.
#[derive(Debug, Clone)]
pub struct Document {
    url: Url,
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    mutations: Vec<MutationRecord>,
    events: Vec<DomEvent>,
}

impl Document {
    /// Create an empty page at `url`.
    pub fn new(url: Url) -> Self {
        let mut doc = Self {
            url,
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            mutations: Vec::new(),
            events: Vec::new(),
        };
        let root = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.nodes[root.0].children = vec![head, body];
        doc.nodes[head.0].parent = Some(root);
        doc.nodes[body.0].parent = Some(root);
        doc.root = root;
        doc.head = head;
        doc.body = body;
        doc
    }

    /// Create an empty page from a URL string.
    pub fn parse_url(url: &str) -> Result<Self, DomError> {
        let url = Url::parse(url).map_err(|e| DomError::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(Self::new(url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The `html` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    /// Create a detached element. Tag names are lowercased.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let tag = tag.to_ascii_lowercase();
        let value = VALUE_TAGS.contains(&tag.as_str()).then(String::new);
        self.push_node(NodeData::Element(ElementData {
            tag,
            value,
            ..Default::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ------------------------------------------------------------------
    // Tree inspection
    // ------------------------------------------------------------------

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Ok(el),
            Some(NodeData::Text(_)) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::UnknownNode(id)),
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).map(|n| &n.data), Some(NodeData::Text(_)))
    }

    /// Lowercase tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Child elements, skipping text nodes.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// Ancestors, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// Descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Whether the node is attached to this document's tree.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.node(id).is_some() && self.contains(self.root, id)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => text.clone(),
            Some(NodeData::Element(_)) => self
                .descendants(id)
                .into_iter()
                .filter_map(|d| match &self.nodes[d.0].data {
                    NodeData::Text(text) => Some(text.as_str()),
                    NodeData::Element(_) => None,
                })
                .collect(),
            None => String::new(),
        }
    }

    // ------------------------------------------------------------------
    // Tree edits
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (or last when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.element_mut(parent)?;
        if self.node(child).is_none() {
            return Err(DomError::UnknownNode(child));
        }
        if reference == Some(child) {
            return Ok(());
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    reference: r,
                });
            }
        }

        self.detach(child);

        let children = &mut self.nodes[parent.0].children;
        let index = reference
            .and_then(|r| children.iter().position(|&c| c == r))
            .unwrap_or(children.len());
        children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);

        self.record(
            parent,
            MutationKind::ChildList {
                added: vec![child],
                removed: Vec::new(),
            },
        );
        Ok(())
    }

    /// `insertAdjacentElement` equivalent.
    pub fn insert_adjacent(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        node: NodeId,
    ) -> Result<(), DomError> {
        match position {
            InsertPosition::InsideStart => {
                let first = self.children(target).first().copied();
                self.insert_before(target, node, first)
            }
            InsertPosition::InsideEnd => self.append_child(target, node),
            InsertPosition::OutsideBefore => {
                let parent = self.parent(target).ok_or(DomError::NoParent(target))?;
                self.insert_before(parent, node, Some(target))
            }
            InsertPosition::OutsideAfter => {
                let parent = self.parent(target).ok_or(DomError::NoParent(target))?;
                let siblings = self.children(parent);
                let next = siblings
                    .iter()
                    .position(|&c| c == target)
                    .and_then(|i| siblings.get(i + 1).copied());
                self.insert_before(parent, node, next)
            }
        }
    }

    /// Detach a node from its parent. Removing the root is a no-op.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if self.node(id).is_none() {
            return Err(DomError::UnknownNode(id));
        }
        if id != self.root {
            self.detach(id);
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        self.record(
            parent,
            MutationKind::ChildList {
                added: Vec::new(),
                removed: vec![id],
            },
        );
    }

    /// Replace all children of an element in one mutation record.
    pub fn replace_children(
        &mut self,
        parent: NodeId,
        new_children: Vec<NodeId>,
    ) -> Result<(), DomError> {
        self.element_mut(parent)?;
        for &child in &new_children {
            if self.node(child).is_none() {
                return Err(DomError::UnknownNode(child));
            }
            if self.contains(child, parent) {
                return Err(DomError::HierarchyRequest { parent, child });
            }
        }

        let removed = std::mem::take(&mut self.nodes[parent.0].children);
        for &old in &removed {
            self.nodes[old.0].parent = None;
        }
        for &child in &new_children {
            if let Some(old_parent) = self.nodes[child.0].parent.take() {
                self.nodes[old_parent.0].children.retain(|&c| c != child);
            }
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0].children = new_children.clone();

        if !removed.is_empty() || !new_children.is_empty() {
            self.record(
                parent,
                MutationKind::ChildList {
                    added: new_children,
                    removed,
                },
            );
        }
        Ok(())
    }

    /// `textContent = text`: elements get a single text child (none when empty),
    /// text nodes get their data replaced.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        match self.node(id).map(|n| &n.data) {
            None => Err(DomError::UnknownNode(id)),
            Some(NodeData::Text(_)) => self.set_character_data(id, text),
            Some(NodeData::Element(_)) => {
                let children = if text.is_empty() {
                    Vec::new()
                } else {
                    vec![self.create_text(text)]
                };
                self.replace_children(id, children)
            }
        }
    }

    /// Edit a text node in place.
    pub fn set_character_data(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.data) {
            Some(NodeData::Text(data)) => {
                if data != text {
                    *data = text.to_string();
                    self.record(id, MutationKind::CharacterData);
                }
                Ok(())
            }
            Some(NodeData::Element(_)) => Err(DomError::NotAnElement(id)),
            None => Err(DomError::UnknownNode(id)),
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.element(id)?
            .attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// All attributes in insertion order.
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        self.element(id)
            .map(|el| el.attributes.as_slice())
            .unwrap_or(&[])
    }

    /// Set an attribute. Setting the current value records nothing.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        let el = self.element_mut(id)?;
        match el.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, current)) if current.as_str() == value => return Ok(()),
            Some((_, current)) => *current = value.to_string(),
            None => el.attributes.push((name.clone(), value.to_string())),
        }
        self.record(id, MutationKind::Attribute { name });
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<(), DomError> {
        let name = name.to_ascii_lowercase();
        let el = self.element_mut(id)?;
        let before = el.attributes.len();
        el.attributes.retain(|(n, _)| *n != name);
        if el.attributes.len() != before {
            self.record(id, MutationKind::Attribute { name });
        }
        Ok(())
    }

    pub fn class_list(&self, id: NodeId) -> Vec<&str> {
        self.attribute(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id).contains(&class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let mut classes: Vec<String> = self.class_list(id).into_iter().map(String::from).collect();
        classes.push(class.to_string());
        self.set_attribute(id, "class", &classes.join(" "))
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if !self.has_class(id, class) {
            return Ok(());
        }
        let classes: Vec<&str> = self
            .class_list(id)
            .into_iter()
            .filter(|c| *c != class)
            .collect();
        let joined = classes.join(" ");
        self.set_attribute(id, "class", &joined)
    }

    /// Whether the element is an editable region (`contenteditable`).
    pub fn is_content_editable(&self, id: NodeId) -> bool {
        matches!(
            self.attribute(id, "contenteditable"),
            Some("") | Some("true") | Some("plaintext-only")
        )
    }

    // ------------------------------------------------------------------
    // Form values
    // ------------------------------------------------------------------

    /// Scalar value of a form field (`None` for other elements).
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.value.as_deref()
    }

    /// Whether the element carries a scalar form value.
    pub fn has_value(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| el.value.is_some())
    }

    /// Set a form value. Like the browser DOM this records no mutation.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        match el.value.as_mut() {
            Some(current) => {
                *current = value.to_string();
                Ok(())
            }
            None => Err(DomError::NotValueBearing(id)),
        }
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn set_rect(&mut self, id: NodeId, rect: BoundingBox) -> Result<(), DomError> {
        self.element_mut(id)?.rect = Some(rect);
        Ok(())
    }

    /// Layout box of an element, if it has one.
    pub fn rect(&self, id: NodeId) -> Option<BoundingBox> {
        self.element(id)?.rect
    }

    /// Topmost connected element whose box contains the point.
    ///
    /// Later document order paints on top, so descendants win over ancestors.
    pub fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| {
                self.rect(id)
                    .is_some_and(|r| !r.is_empty() && r.contains(x, y))
            })
            .last()
    }

    // ------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------

    pub fn matches(&self, id: NodeId, selectors: &SelectorList) -> bool {
        selectors.matches(self, id)
    }

    /// Descendants of `scope` matching the selectors, in document order.
    pub fn select_all(&self, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
        selectors
            .filter(self, Some(scope), self.descendants(scope))
            .collect()
    }

    pub fn select_first(&self, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        selectors
            .filter(self, Some(scope), self.descendants(scope))
            .next()
    }

    /// Nearest inclusive ancestor matching the selectors.
    pub fn closest(&self, id: NodeId, selectors: &SelectorList) -> Option<NodeId> {
        let chain = std::iter::once(id).chain(self.ancestors(id));
        selectors.filter(self, None, chain).next()
    }

    /// Identity handle for selector matching.
    pub(crate) fn opaque(&self, id: NodeId) -> OpaqueElement {
        match self.node(id) {
            Some(node) => OpaqueElement::new(node),
            None => OpaqueElement::new(self),
        }
    }

    /// `querySelectorAll` with a selector string.
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selectors: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        let list = SelectorList::parse(selectors)?;
        Ok(self.select_all(scope, &list))
    }

    /// `querySelector` with a selector string.
    pub fn query_selector(
        &self,
        scope: NodeId,
        selectors: &str,
    ) -> Result<Option<NodeId>, DomError> {
        let list = SelectorList::parse(selectors)?;
        Ok(self.select_first(scope, &list))
    }

    // ------------------------------------------------------------------
    // Mutation records and events
    // ------------------------------------------------------------------

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        // Detached subtrees are not observable.
        if self.is_connected(target) {
            self.mutations.push(MutationRecord { target, kind });
        }
    }

    /// Drain pending mutation records.
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.mutations)
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.mutations.is_empty()
    }

    /// Queue a user-originated event.
    pub fn dispatch_event(&mut self, target: NodeId, kind: EventKind) {
        self.events.push(DomEvent {
            target,
            kind,
            synthetic: false,
        });
    }

    /// Queue a programmatic event.
    pub fn dispatch_synthetic(&mut self, target: NodeId, kind: EventKind) {
        self.events.push(DomEvent {
            target,
            kind,
            synthetic: true,
        });
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// HTML-like rendering of a subtree, for logs and the CLI.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag.as_str()) {
                    return;
                }
                if el.tag == "textarea" {
                    out.push_str(&escape_text(el.value.as_deref().unwrap_or_default()));
                }
                for &child in &node.children {
                    self.write_markup(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
