//! # edgequake-topic2pptx
//!
//! Turn a topic, an audience and a slide count into a styled PowerPoint deck
//! using a Large Language Model.
//!
//! ## Why this crate?
//!
//! Writing the outline is the slow part of building a deck. This crate asks
//! an LLM for the outline as a JSON array of slides, recovers that array
//! from whatever prose or code fences the model wraps it in, and renders it
//! into a `.pptx` with a consistent font, size tier and color theme. No
//! template file or Office installation is needed; the OOXML package is
//! written directly.
//!
//! ## Pipeline Overview
//!
//! ```text
//! DeckRequest
//!  │
//!  ├─ 1. Prompt    topic + audience + purpose → outline request
//!  ├─ 2. Complete  one call to gemini / gpt / claude / ollama / …
//!  ├─ 3. Sanitize  strip fences, find the array, parse (fallback deck on failure)
//!  ├─ 4. Assemble  title slide + content slides, styled per run
//!  └─ 5. Write     OOXML package → temp file → atomic rename
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_topic2pptx::{generate, DeckRequest, GenerationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from GEMINI_API_KEY / OPENAI_API_KEY / …
//!     let config = GenerationConfig::default();
//!     let request = DeckRequest::new("Intro to AI", 5, "high-school students");
//!     let deck = generate(&request, &config).await?;
//!     println!("{}", edgequake_topic2pptx::preview_text(&deck.preview));
//!     eprintln!("wrote {} ({} slides)", deck.path.display(), deck.stats.slides_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `topic2pptx` binary (clap, indicatif, tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-topic2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## Styles
//!
//! | Size tier | Title | Subtitle | Body |
//! |-----------|-------|----------|------|
//! | Small     | 32 pt | 24 pt    | 18 pt |
//! | Medium    | 40 pt | 28 pt    | 20 pt |
//! | Large     | 44 pt | 32 pt    | 24 pt |
//!
//! Fonts: Arial, Calibri, Times New Roman, Helvetica, Georgia. Themes:
//! Professional Blue, Forest Green, Classic Gray, Deep Purple, Elegant Black.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod deck;
pub mod document;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod style;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder, SlideSize, DEFAULT_OUTPUT_PATH};
pub use deck::{preview_text, DeckRequest, DeckSpec, Purpose, SlideRecord};
pub use error::DeckError;
pub use generate::{
    download_file_name, generate, generate_sync, generate_with_client, render_to_file,
    resolve_client,
};
pub use output::{GeneratedDeck, GenerationStats, PPTX_MIME};
pub use pipeline::llm::{Completion, CompletionClient, LlmCompletionClient};
pub use pipeline::sanitize::{sanitize, sanitize_with, BracketScan, Sanitized};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
pub use style::{ColorTheme, FontFamily, ResolvedStyle, Rgb, SizeTier, StyleProfile};
