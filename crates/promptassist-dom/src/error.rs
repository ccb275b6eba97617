//! DOM errors.

use thiserror::Error;

use crate::dom_types::NodeId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0} does not carry a form value")]
    NotValueBearing(NodeId),

    #[error("Node {0} has no parent")]
    NoParent(NodeId),

    #[error("Node {reference} is not a child of {parent}")]
    NotAChild { parent: NodeId, reference: NodeId },

    #[error("Cannot insert {child} into {parent}: it would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid page fixture: {0}")]
    Fixture(String),
}
