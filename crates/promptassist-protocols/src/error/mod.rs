//! Error types for the protocol layer.

mod credential;
mod rewrite;

pub use credential::*;
pub use rewrite::*;
