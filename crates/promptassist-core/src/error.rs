//! Overlay errors.

use thiserror::Error;

use promptassist_dom::DomError;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid selector in site '{site}': {source}")]
    Selector {
        site: String,
        #[source]
        source: DomError,
    },

    #[error("Overlay run loop has stopped")]
    Closed,
}
