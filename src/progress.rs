//! Progress-callback trait for per-stage generation events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GenerationConfigBuilder::progress_callback`] to be told
//! when each pipeline stage starts and finishes. The completion call can
//! take several seconds; a shell uses these events to show a spinner or a
//! status line while the core blocks on it.
//!
//! # Example
//!
//! ```rust
//! use edgequake_topic2pptx::{GenerationConfig, GenerationProgressCallback, Stage};
//! use std::sync::Arc;
//!
//! struct StderrLogger;
//!
//! impl GenerationProgressCallback for StderrLogger {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("{stage}…");
//!     }
//! }
//!
//! let config = GenerationConfig::builder()
//!     .progress_callback(Arc::new(StderrLogger) as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// The pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Prompt,
    Completion,
    Sanitize,
    Assemble,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Prompt => "Building prompt",
            Stage::Completion => "Waiting for the model",
            Stage::Sanitize => "Parsing outline",
            Stage::Assemble => "Assembling slides",
            Stage::Write => "Writing presentation",
        })
    }
}

/// Called by the generation pipeline as it moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Stages run strictly in sequence, but the trait is
/// `Send + Sync` so a callback can be shared with other tasks.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once before the prompt is built.
    fn on_generation_start(&self, topic: &str, slide_count: u32) {
        let _ = (topic, slide_count);
    }

    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// `elapsed_ms` is the wall-clock time spent in `stage`.
    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// Called when the completion reply could not be parsed and the
    /// placeholder deck is used instead.
    fn on_fallback(&self) {}

    /// Called once after the artifact has been written.
    fn on_generation_complete(&self, slides_written: usize) {
        let _ = slides_written;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GenerationConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
