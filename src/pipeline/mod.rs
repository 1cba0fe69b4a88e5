//! Pipeline stages for topic-to-deck generation.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested on its own and the completion backend can be swapped without
//! touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! prompt ──▶ llm ──▶ sanitize ──▶ assemble ──▶ render
//! (text)    (reply)  (records)    (Document)   (.pptx bytes)
//! ```
//!
//! 1. [`crate::prompts`] builds the outline request (lives at the crate
//!    root next to the system prompt it pairs with)
//! 2. [`llm`]: one completion call; the only stage with network I/O
//! 3. [`sanitize`]: strip fences and prose, parse the slide array, fall
//!    back to a placeholder deck when that fails
//! 4. [`assemble`]: map records onto title/content layouts and apply the
//!    resolved style to every run
//! 5. [`render`]: serialise the styled document into an OOXML package

pub mod assemble;
pub mod llm;
pub mod render;
pub mod sanitize;
