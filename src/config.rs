//! Configuration types for deck generation.
//!
//! All generation behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. Per-request inputs (topic, audience,
//! style) live in [`crate::deck::DeckRequest`]; this struct only holds what
//! stays the same from one request to the next.

use crate::error::DeckError;
use crate::pipeline::llm::CompletionClient;
use crate::pipeline::sanitize::BracketScan;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the artifact lands when no path is configured. Overwritten by
/// every request.
pub const DEFAULT_OUTPUT_PATH: &str = "generated_presentation.pptx";

/// Configuration for deck generation.
///
/// # Example
/// ```rust
/// use edgequake_topic2pptx::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("gemini-2.0-flash")
///     .provider_name("gemini")
///     .output_path("out/deck.pptx")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// LLM model identifier, e.g. "gpt-4.1-mini", "gemini-2.0-flash".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "gemini", "ollama").
    /// If None along with `client`, the provider is auto-detected.
    pub provider_name: Option<String>,

    /// Pre-constructed completion client. Takes precedence over `provider_name`.
    pub client: Option<Arc<dyn CompletionClient>>,

    /// Sampling temperature. Default: 0.7.
    ///
    /// Outline writing benefits from some variety; 0.7 keeps titles lively
    /// while the JSON shape stays stable.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 4096.
    ///
    /// A ten-slide outline with examples and image descriptions runs to
    /// roughly 1 500 tokens. A reply cut off mid-array falls back to the
    /// placeholder deck, so err on the generous side.
    pub max_tokens: usize,

    /// Custom system prompt. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Path the presentation is written to. Default: [`DEFAULT_OUTPUT_PATH`].
    pub output_path: PathBuf,

    /// How the sanitizer locates the JSON array in the reply. Default:
    /// [`BracketScan::FirstLast`].
    pub bracket_scan: BracketScan,

    /// Slide dimensions. Default: [`SlideSize::Standard`] (4:3).
    pub slide_size: SlideSize,

    /// Completion timeout the shell applies around a whole request, in
    /// seconds. The library itself never times out. Default: 120.
    pub api_timeout_secs: u64,

    /// Stage progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            client: None,
            temperature: 0.7,
            max_tokens: 4096,
            system_prompt: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            bracket_scan: BracketScan::default(),
            slide_size: SlideSize::default(),
            api_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("client", &self.client.as_ref().map(|_| "<dyn CompletionClient>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("output_path", &self.output_path)
            .field("bracket_scan", &self.bracket_scan)
            .field("slide_size", &self.slide_size)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.config.client = Some(client);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    pub fn bracket_scan(mut self, scan: BracketScan) -> Self {
        self.config.bracket_scan = scan;
        self
    }

    pub fn slide_size(mut self, size: SlideSize) -> Self {
        self.config.slide_size = size;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, DeckError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(DeckError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.output_path.as_os_str().is_empty() {
            return Err(DeckError::InvalidConfig("output path must not be empty".into()));
        }
        if c.output_path.file_name().is_none() {
            return Err(DeckError::InvalidConfig(format!(
                "output path '{}' does not name a file",
                c.output_path.display()
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Slide dimensions written into `presentation.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideSize {
    /// 10 in × 7.5 in (4:3). (default)
    #[default]
    Standard,
    /// 13.333 in × 7.5 in (16:9).
    Widescreen,
}

impl SlideSize {
    /// Width and height in EMU (914 400 per inch).
    pub fn emu(self) -> (i64, i64) {
        match self {
            SlideSize::Standard => (9_144_000, 6_858_000),
            SlideSize::Widescreen => (12_192_000, 6_858_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = GenerationConfig::default();
        assert_eq!(c.output_path, PathBuf::from("generated_presentation.pptx"));
        assert_eq!(c.max_tokens, 4096);
        assert_eq!(c.bracket_scan, BracketScan::FirstLast);
        assert_eq!(c.slide_size, SlideSize::Standard);
        assert!(c.client.is_none());
    }

    #[test]
    fn temperature_is_clamped() {
        let c = GenerationConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = GenerationConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let err = GenerationConfig::builder().max_tokens(0).build().unwrap_err();
        assert!(matches!(err, DeckError::InvalidConfig(_)));
    }

    #[test]
    fn empty_output_path_rejected() {
        let err = GenerationConfig::builder().output_path("").build().unwrap_err();
        assert!(matches!(err, DeckError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_client() {
        let c = GenerationConfig::default();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("GenerationConfig"));
        assert!(dbg.contains("output_path"));
    }

    #[test]
    fn slide_sizes() {
        assert_eq!(SlideSize::Standard.emu(), (9_144_000, 6_858_000));
        assert_eq!(SlideSize::Widescreen.emu().0, 12_192_000);
    }
}
