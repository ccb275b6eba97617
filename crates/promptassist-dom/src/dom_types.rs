//! Shared DOM types: node handles, geometry, mutation records and events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a node inside a [`crate::Document`].
///
/// Handles are non-owning: the document owns every node, and a handle stays
/// valid (but possibly disconnected) after the host removes the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bounding box for an element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside this bounding box.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Bottom-right corner.
    pub fn bottom_right(&self) -> (f64, f64) {
        (self.x + self.width, self.y + self.height)
    }

    /// Euclidean distance between the centers of two boxes.
    pub fn center_distance(&self, other: &BoundingBox) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    /// Whether the box has a visible area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Where to insert a node relative to a target element.
///
/// Accepts the friendly names used in site descriptors as well as the raw
/// `insertAdjacentElement` positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InsertPosition {
    /// First child of the target (`afterbegin`).
    #[serde(rename = "inside-start", alias = "afterbegin")]
    InsideStart,
    /// Last child of the target (`beforeend`).
    #[default]
    #[serde(rename = "inside-end", alias = "beforeend")]
    InsideEnd,
    /// Previous sibling of the target (`beforebegin`).
    #[serde(rename = "outside-before", alias = "beforebegin")]
    OutsideBefore,
    /// Next sibling of the target (`afterend`).
    #[serde(rename = "outside-after", alias = "afterend")]
    OutsideAfter,
}

impl InsertPosition {
    /// The equivalent `insertAdjacentElement` position name.
    pub fn dom_name(&self) -> &'static str {
        match self {
            Self::InsideStart => "afterbegin",
            Self::InsideEnd => "beforeend",
            Self::OutsideBefore => "beforebegin",
            Self::OutsideAfter => "afterend",
        }
    }
}

/// What changed in a mutation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MutationKind {
    ChildList {
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    CharacterData,
    Attribute {
        name: String,
    },
}

/// A single observed change to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Node whose children, data or attribute changed.
    pub target: NodeId,
    pub kind: MutationKind,
}

impl MutationRecord {
    /// Nodes added by this record (empty for non child-list records).
    pub fn added_nodes(&self) -> &[NodeId] {
        match &self.kind {
            MutationKind::ChildList { added, .. } => added,
            _ => &[],
        }
    }

    pub fn is_child_list(&self) -> bool {
        matches!(self.kind, MutationKind::ChildList { .. })
    }
}

/// Kinds of events the overlay listens for or dispatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventKind {
    Input,
    Change,
    KeyDown { key: String },
    Click,
    PointerEnter,
    PointerLeave,
}

/// An event dispatched on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomEvent {
    pub target: NodeId,
    pub kind: EventKind,
    /// Dispatched programmatically by the overlay rather than by the user.
    pub synthetic: bool,
}
