//! Mutation watchers.
//!
//! Three scopes consume the same batches of mutation records: the page
//! (new inputs may have appeared), a pending container search (a real
//! container may have appeared), and a rich editor's content (the prompt
//! text may have changed without an input event).

use promptassist_dom::{Document, MutationRecord, NodeId};

use crate::locator::is_owned;

/// Whether a batch adds anything the overlay did not create itself.
pub fn adds_foreign_nodes(doc: &Document, records: &[MutationRecord]) -> bool {
    records.iter().any(|record| {
        !is_owned(doc, record.target)
            && record
                .added_nodes()
                .iter()
                .any(|&node| !is_owned(doc, node))
    })
}

/// Whether a batch removed nodes, which may have taken bound inputs with them.
pub fn removes_nodes(records: &[MutationRecord]) -> bool {
    use promptassist_dom::MutationKind;

    records.iter().any(|record| match &record.kind {
        MutationKind::ChildList { removed, .. } => !removed.is_empty(),
        _ => false,
    })
}

/// Watches a subtree for a container to appear. Dropped once it is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerWatch {
    scope: NodeId,
}

impl ContainerWatch {
    pub fn new(scope: NodeId) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> NodeId {
        self.scope
    }

    /// Any change inside the scope that the overlay did not make.
    pub fn is_triggered(&self, doc: &Document, records: &[MutationRecord]) -> bool {
        records
            .iter()
            .any(|record| doc.contains(self.scope, record.target) && !is_owned(doc, record.target))
    }
}

/// Debounced watch over a rich editor's content.
///
/// Every batch touching the editor bumps the generation; only the settle
/// timer carrying the latest generation re-evaluates the button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWatch {
    input: NodeId,
    generation: u64,
}

impl ContentWatch {
    pub fn new(input: NodeId) -> Self {
        Self {
            input,
            generation: 0,
        }
    }

    /// Child-list, subtree or character-data changes inside the editor.
    pub fn is_triggered(&self, doc: &Document, records: &[MutationRecord]) -> bool {
        records
            .iter()
            .any(|record| doc.contains(self.input, record.target))
    }

    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
