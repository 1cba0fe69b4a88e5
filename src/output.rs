//! Result types returned by the generation entry points.

use crate::deck::DeckSpec;
use serde::Serialize;
use std::path::PathBuf;

pub use crate::pipeline::render::PPTX_MIME;

/// A finished presentation on disk plus what went into it.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDeck {
    /// Where the `.pptx` was written.
    pub path: PathBuf,

    /// Suggested download name derived from the topic, e.g.
    /// `intro_to_ai_presentation.pptx`. Independent of `path`.
    pub file_name: String,

    /// Always [`PPTX_MIME`].
    pub mime_type: &'static str,

    /// The slide records the file was built from, for preview.
    pub preview: DeckSpec,

    pub stats: GenerationStats,
}

/// Counters and timings for one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    pub slides_written: usize,

    /// True when the reply could not be parsed and the placeholder deck was
    /// written instead.
    pub used_fallback: bool,

    pub prompt_chars: usize,
    pub response_chars: usize,
    pub input_tokens: usize,
    pub output_tokens: usize,

    pub bytes_written: usize,

    /// Time spent waiting on the completion service.
    pub completion_duration_ms: u64,
    pub total_duration_ms: u64,
}
