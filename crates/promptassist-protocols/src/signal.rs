//! Cross-context signals sent from the page overlay to the host.

use serde::{Deserialize, Serialize};

/// Message from the overlay to whatever hosts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum HostSignal {
    /// A button was clicked without a credential; show the credential entry surface.
    #[serde(rename = "showPopup")]
    ShowCredentialSurface,
}
