//! Credential gate.
//!
//! Tracks whether a credential is present and tells the overlay what a
//! change means for the bound buttons.

use tracing::{debug, info};

use promptassist_protocols::{CredentialChange, CredentialTransition};

/// What the overlay must do after a credential change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateAction {
    /// Force every button to `NoCredential`.
    CollapseAll,
    /// Re-evaluate every button and run a fresh discovery pass.
    Rediscover,
    /// Nothing observable changed.
    Nothing,
}

#[derive(Debug, Clone, Default)]
pub struct CredentialGate {
    present: bool,
}

impl CredentialGate {
    pub fn new(credential: Option<&str>) -> Self {
        Self {
            present: is_present(credential),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.present
    }

    /// Apply a change notification.
    pub fn apply(&mut self, change: &CredentialChange) -> GateAction {
        if change.transition() == CredentialTransition::Rotated {
            debug!("Credential rotated");
        }
        self.set_present(is_present(change.new_value.as_deref()))
    }

    /// Reconcile with a freshly read value, e.g. after missed notifications.
    pub fn sync(&mut self, credential: Option<&str>) -> GateAction {
        self.set_present(is_present(credential))
    }

    fn set_present(&mut self, present: bool) -> GateAction {
        let action = match (self.present, present) {
            (false, true) => GateAction::Rediscover,
            (true, false) => GateAction::CollapseAll,
            _ => GateAction::Nothing,
        };
        if action != GateAction::Nothing {
            info!("Credential {}", if present { "added" } else { "removed" });
        }
        self.present = present;
        action
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
