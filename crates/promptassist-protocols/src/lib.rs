//! # Prompt Assist Protocols
//!
//! Contracts between the overlay engine and its external collaborators.
//! Contains only interface definitions and plain data types.
//!
//! ## Core Traits
//!
//! - [`Rewriter`] - the language-model call that improves a prompt
//! - [`CredentialStore`] - key-value storage for the API key, with change notifications

pub mod credential;
pub mod error;
pub mod rewrite;
pub mod signal;

pub use credential::{CredentialChange, CredentialStore, CredentialTransition};
pub use error::{CredentialError, RewriteError};
pub use rewrite::{RewriteResult, Rewriter};
pub use signal::HostSignal;
