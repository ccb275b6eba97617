//! JSON page fixtures.
//!
//! ```json
//! {
//!   "url": "https://example.com/chat",
//!   "body": [
//!     { "tag": "form", "children": [
//!       { "tag": "textarea", "attrs": { "id": "prompt" }, "value": "hello",
//!         "rect": [0, 0, 600, 80] },
//!       { "tag": "div", "attrs": { "class": "toolbar" } }
//!     ]}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::document::Document;
use crate::dom_types::{BoundingBox, NodeId};
use crate::error::DomError;

/// A page description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFixture {
    pub url: String,
    #[serde(default)]
    pub head: Vec<NodeFixture>,
    #[serde(default)]
    pub body: Vec<NodeFixture>,
}

/// One node. Without a `tag` it is a text node carrying `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeFixture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `[x, y, width, height]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeFixture>,
}

impl PageFixture {
    pub fn from_json(json: &str) -> Result<Self, DomError> {
        serde_json::from_str(json).map_err(|e| DomError::Fixture(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, DomError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DomError::Fixture(format!("{}: {}", path.display(), e)))?;
        trace!("Read page fixture {:?} ({} bytes)", path, content.len());
        Self::from_json(&content)
    }

    /// Build the document. Load-time mutations are discarded.
    pub fn into_document(self) -> Result<Document, DomError> {
        let mut doc = Document::parse_url(&self.url)?;
        let (head, body) = (doc.head(), doc.body());
        for node in &self.head {
            let id = node.build(&mut doc)?;
            doc.append_child(head, id)?;
        }
        for node in &self.body {
            let id = node.build(&mut doc)?;
            doc.append_child(body, id)?;
        }
        doc.take_mutations();
        debug!(
            "Built page {} ({} body elements)",
            doc.url(),
            doc.descendants(body).iter().filter(|&&n| doc.is_element(n)).count()
        );
        Ok(doc)
    }
}

impl NodeFixture {
    fn build(&self, doc: &mut Document) -> Result<NodeId, DomError> {
        let Some(tag) = &self.tag else {
            let text = self
                .text
                .as_deref()
                .ok_or_else(|| DomError::Fixture("node needs a tag or text".to_string()))?;
            return Ok(doc.create_text(text));
        };

        let id = doc.create_element(tag);
        for (name, value) in &self.attrs {
            doc.set_attribute(id, name, value)?;
        }
        if let Some(value) = &self.value {
            doc.set_value(id, value)?;
        }
        if let Some([x, y, width, height]) = self.rect {
            doc.set_rect(id, BoundingBox::new(x, y, width, height))?;
        }
        if let Some(text) = &self.text {
            let text_node = doc.create_text(text);
            doc.append_child(id, text_node)?;
        }
        for child in &self.children {
            let child_id = child.build(doc)?;
            doc.append_child(id, child_id)?;
        }
        Ok(id)
    }
}

#[cfg(test)]
#[path = "fixture_tests.rs"]
mod tests;
