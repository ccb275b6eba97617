//! # Prompt Assist Provider - Gemini
//!
//! Prompt rewriting backed by the Gemini `generateContent` REST API.

mod client;
mod prompt;
mod rewriter;
mod types;

pub use client::GeminiClient;
pub use prompt::{SYSTEM_PROMPT, build_prompt, extract_result};
pub use rewriter::GeminiRewriter;
pub use types::*;
