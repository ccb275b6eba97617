//! # Prompt Assist Core
//!
//! The overlay engine: finds chat inputs on a page, attaches an action
//! button to each, and keeps every button's state in step with the prompt
//! text, the stored credential and the rewrite in flight.
//!
//! ## Components
//!
//! - [`Overlay`] - synchronous message handler over a page [`Document`]
//! - [`OverlayRunLoop`] - async driver that executes the overlay's [`Effect`]s
//! - [`locator`] - input discovery and the container cascade
//! - [`text_io`] - reading and writing prompt text for each input shape
//! - [`ButtonState`] - the per-button state machine
//!
//! [`Document`]: promptassist_dom::Document

pub mod binding;
pub mod credential_gate;
pub mod error;
pub mod locator;
pub mod overlay;
pub mod render;
pub mod run_loop;
pub mod state;
pub mod text_io;
pub mod watcher;

pub use binding::{BindingId, InputBinding};
pub use credential_gate::{CredentialGate, GateAction};
pub use error::OverlayError;
pub use locator::{ContainerHit, ContainerStrategy, SiteSelectors};
pub use overlay::{Effect, Overlay, OverlayMessage, OverlayOptions};
pub use render::Icon;
pub use run_loop::{OverlayHandle, OverlayRunLoop};
pub use state::ButtonState;
pub use text_io::{InputKind, PromptInput};
