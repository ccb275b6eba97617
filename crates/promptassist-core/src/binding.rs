//! Input bindings.

use std::fmt;

use promptassist_dom::NodeId;

use crate::locator::ContainerStrategy;
use crate::render::Icon;
use crate::state::ButtonState;
use crate::text_io::InputKind;
use crate::watcher::{ContainerWatch, ContentWatch};

/// Identifies one binding for the lifetime of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding-{}", self.0)
    }
}

/// One discovered input and the button the overlay attached to it.
///
/// The input is owned by the page; the binding only holds its handle and is
/// dropped once the page disconnects the input.
#[derive(Debug, Clone)]
pub struct InputBinding {
    pub(crate) id: BindingId,
    pub(crate) input: NodeId,
    pub(crate) kind: InputKind,
    pub(crate) button: NodeId,
    pub(crate) container: NodeId,
    pub(crate) strategy: ContainerStrategy,
    pub(crate) container_watch: Option<ContainerWatch>,
    pub(crate) content_watch: Option<ContentWatch>,
    pub(crate) state: ButtonState,
    pub(crate) has_credential: bool,
    pub(crate) hovered: bool,
    pub(crate) drawn: Option<Icon>,
    pub(crate) revert_generation: u64,
    pub(crate) pending_request: Option<u64>,
}

impl InputBinding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn button(&self) -> NodeId {
        self.button
    }

    /// Element the button currently sits in.
    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn strategy(&self) -> ContainerStrategy {
        self.strategy
    }

    /// Whether the button still sits in a synthesized container while the
    /// overlay waits for a real one.
    pub fn is_container_pending(&self) -> bool {
        self.container_watch.is_some()
    }

    pub fn state(&self) -> &ButtonState {
        &self.state
    }

    /// Credential presence as of the last evaluation.
    pub fn has_credential(&self) -> bool {
        self.has_credential
    }

    /// Whether a rewrite request is in flight. Independent of [`Self::state`]: a
    /// credential removal shows `NoCredential` while the request still runs.
    pub fn has_pending_request(&self) -> bool {
        self.pending_request.is_some()
    }
}
