//! # Prompt Assist DOM
//!
//! The host-page model the overlay engine runs against.
//!
//! A [`Document`] is an arena of element and text nodes with the handful of
//! DOM capabilities the engine relies on:
//!
//! - CSS selector queries ([`SelectorList`], parsed by `scraper` and matched
//!   by `selectors`): `querySelectorAll`, `closest`, `matches`
//! - Tree edits that append [`MutationRecord`]s, drained in batches like a
//!   `MutationObserver` callback
//! - A queue of dispatched [`DomEvent`]s (input, change, key, click, pointer)
//! - Bounding boxes and hit testing (`elementFromPoint`)
//! - Form values that change without touching the tree
//!
//! Pages can be described as JSON with [`PageFixture`].

mod document;
mod dom_types;
mod error;
mod fixture;
mod selector;

pub use document::Document;
pub use dom_types::{
    BoundingBox, DomEvent, EventKind, InsertPosition, MutationKind, MutationRecord, NodeId,
};
pub use error::DomError;
pub use fixture::{NodeFixture, PageFixture};
pub use selector::SelectorList;
