//! Generation entry points: topic in, `.pptx` on disk out.
//!
//! One request runs the pipeline stages strictly in sequence. The only
//! suspension point is the completion call; everything after it is pure
//! CPU work on a few kilobytes of text, followed by a single file write.
//!
//! The artifact is written atomically: bytes are built in memory, written
//! to a temporary file next to the destination and renamed over it. Any
//! failure before the rename leaves the previous file (if any) untouched.

use crate::config::{GenerationConfig, SlideSize};
use crate::deck::{DeckRequest, SlideRecord};
use crate::error::DeckError;
use crate::output::{GeneratedDeck, GenerationStats, PPTX_MIME};
use crate::pipeline::llm::{CompletionClient, LlmCompletionClient};
use crate::pipeline::{assemble, render, sanitize};
use crate::progress::{GenerationProgressCallback, Stage};
use crate::prompts::build_prompt;
use crate::style::{resolve, ResolvedStyle, StyleProfile};
use edgequake_llm::{LLMProvider, ProviderFactory};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Generate a deck for `request` and write it to `config.output_path`.
///
/// The style is resolved before any provider is built, so a bad font, size
/// or theme name fails without touching the network.
///
/// # Errors
/// - [`DeckError::Configuration`] for an unknown style entry
/// - [`DeckError::ProviderNotConfigured`] when no completion backend can be
///   built from the config or environment
/// - [`DeckError::Service`] when the completion call fails
/// - [`DeckError::Assembly`] / [`DeckError::OutputWriteFailed`] when the
///   file cannot be produced
///
/// An unparseable reply is not an error: the placeholder deck is written
/// and `stats.used_fallback` is set.
pub async fn generate(
    request: &DeckRequest,
    config: &GenerationConfig,
) -> Result<GeneratedDeck, DeckError> {
    resolve(&request.style)?;
    let client = resolve_client(config)?;
    generate_with_client(request, client.as_ref(), config).await
}

/// [`generate`] with an explicit completion client.
pub async fn generate_with_client(
    request: &DeckRequest,
    client: &dyn CompletionClient,
    config: &GenerationConfig,
) -> Result<GeneratedDeck, DeckError> {
    let total_start = Instant::now();
    let style = resolve(&request.style)?;
    let cb = config.progress_callback.as_deref();

    info!(
        "Generating {} slides on '{}' for '{}'",
        request.slide_count, request.topic, request.audience
    );
    if let Some(cb) = cb {
        cb.on_generation_start(&request.topic, request.slide_count);
    }

    // ── Step 1: Prompt ───────────────────────────────────────────────────
    let timer = StageTimer::start(cb, Stage::Prompt);
    let prompt = build_prompt(
        &request.topic,
        request.slide_count,
        request.purpose,
        &request.audience,
    );
    timer.finish();

    // ── Step 2: Completion ───────────────────────────────────────────────
    let timer = StageTimer::start(cb, Stage::Completion);
    let completion = client.complete(&prompt).await?;
    let completion_duration_ms = timer.finish();
    debug!(
        "Reply: {} chars in {}ms",
        completion.text.len(),
        completion_duration_ms
    );

    // ── Step 3: Sanitize ─────────────────────────────────────────────────
    let timer = StageTimer::start(cb, Stage::Sanitize);
    let sanitized = sanitize::sanitize_with(&completion.text, config.bracket_scan);
    timer.finish();
    if sanitized.used_fallback {
        if let Some(cb) = cb {
            cb.on_fallback();
        }
    }

    // ── Step 4: Assemble + serialise ─────────────────────────────────────
    let timer = StageTimer::start(cb, Stage::Assemble);
    let bytes = build_package(&sanitized.deck, &style, config.slide_size)?;
    timer.finish();

    // ── Step 5: Write ────────────────────────────────────────────────────
    let timer = StageTimer::start(cb, Stage::Write);
    write_atomically(&config.output_path, &bytes)?;
    timer.finish();

    let stats = GenerationStats {
        slides_written: sanitized.deck.len(),
        used_fallback: sanitized.used_fallback,
        prompt_chars: prompt.chars().count(),
        response_chars: completion.text.chars().count(),
        input_tokens: completion.input_tokens,
        output_tokens: completion.output_tokens,
        bytes_written: bytes.len(),
        completion_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Wrote {} slides to {} in {}ms{}",
        stats.slides_written,
        config.output_path.display(),
        stats.total_duration_ms,
        if stats.used_fallback { " (fallback deck)" } else { "" }
    );
    if let Some(cb) = cb {
        cb.on_generation_complete(stats.slides_written);
    }

    Ok(GeneratedDeck {
        path: config.output_path.clone(),
        file_name: download_file_name(&request.topic),
        mime_type: PPTX_MIME,
        preview: sanitized.deck,
        stats,
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    request: &DeckRequest,
    config: &GenerationConfig,
) -> Result<GeneratedDeck, DeckError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DeckError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(request, config))
}

/// Style `deck` and write it to `path` without calling any model.
///
/// Returns the number of bytes written.
pub fn render_to_file(
    deck: &[SlideRecord],
    profile: &StyleProfile,
    path: impl AsRef<Path>,
) -> Result<usize, DeckError> {
    let style = resolve(profile)?;
    let bytes = build_package(deck, &style, SlideSize::default())?;
    write_atomically(path.as_ref(), &bytes)?;
    Ok(bytes.len())
}

/// Suggested download name: the lowercased topic with whitespace runs
/// replaced by `_`, plus `_presentation.pptx`.
///
/// Characters that are not allowed in file names on common platforms are
/// dropped after the whitespace pass, so tabs and newlines still separate
/// words. An empty result yields `presentation.pptx`.
pub fn download_file_name(topic: &str) -> String {
    static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
    static UNSAFE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).expect("valid regex"));

    let lowered = topic.trim().to_lowercase();
    let joined = WHITESPACE.replace_all(&lowered, "_");
    let cleaned = UNSAFE.replace_all(&joined, "");
    let slug = cleaned.trim_matches('_');
    if slug.is_empty() {
        "presentation.pptx".to_string()
    } else {
        format!("{slug}_presentation.pptx")
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn build_package(
    deck: &[SlideRecord],
    style: &ResolvedStyle,
    slide_size: SlideSize,
) -> Result<Vec<u8>, DeckError> {
    let document = assemble::assemble(deck, style)?;
    render::write_pptx(&document, slide_size)
}

/// Write `bytes` to a temp file in the destination directory, then rename
/// it over `path`.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), DeckError> {
    let fail = |source: std::io::Error| DeckError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(fail)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Reports a stage's start and completion to the progress callback.
struct StageTimer<'a> {
    cb: Option<&'a dyn GenerationProgressCallback>,
    stage: Stage,
    start: Instant,
}

impl<'a> StageTimer<'a> {
    fn start(cb: Option<&'a dyn GenerationProgressCallback>, stage: Stage) -> Self {
        debug!("Stage: {}", stage);
        if let Some(cb) = cb {
            cb.on_stage_start(stage);
        }
        Self {
            cb,
            stage,
            start: Instant::now(),
        }
    }

    /// Returns elapsed milliseconds.
    fn finish(self) -> u64 {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        if let Some(cb) = self.cb {
            cb.on_stage_complete(self.stage, elapsed_ms);
        }
        elapsed_ms
    }
}

/// Model used when a provider is named without one.
fn default_model(provider: &str) -> &'static str {
    match provider {
        "openai" => "gpt-4.1-mini",
        "anthropic" => "claude-sonnet-4-20250514",
        "ollama" => "llama3.2",
        _ => "gemini-2.0-flash",
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, DeckError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        DeckError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the completion backend, from most-specific to least-specific:
///
/// 1. **Injected client** (`config.client`), used as-is.
/// 2. **Named provider** (`config.provider_name`) with `config.model` or
///    the provider's default model.
/// 3. **Environment pair** `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`,
///    when both are set and non-empty.
/// 4. **Gemini** when `GEMINI_API_KEY` is set.
/// 5. **Full auto-detection** via [`ProviderFactory::from_env`].
pub fn resolve_client(config: &GenerationConfig) -> Result<Arc<dyn CompletionClient>, DeckError> {
    if let Some(ref client) = config.client {
        return Ok(Arc::clone(client));
    }
    let provider = resolve_provider(config)?;
    Ok(Arc::new(LlmCompletionClient::new(provider, config)))
}

fn resolve_provider(config: &GenerationConfig) -> Result<Arc<dyn LLMProvider>, DeckError> {
    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or_else(|| default_model(name));
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            let model = config.model.as_deref().unwrap_or_else(|| default_model("gemini"));
            return create_provider("gemini", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| DeckError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set GEMINI_API_KEY, OPENAI_API_KEY, ANTHROPIC_API_KEY, or pass --provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_name_follows_topic() {
        assert_eq!(download_file_name("Intro to AI"), "intro_to_ai_presentation.pptx");
        assert_eq!(
            download_file_name("  Rust   Async\tBasics "),
            "rust_async_basics_presentation.pptx"
        );
    }

    #[test]
    fn download_name_splits_on_tabs_and_newlines() {
        assert_eq!(
            download_file_name("Line\nBreak\tTopic\r\nEnd"),
            "line_break_topic_end_presentation.pptx"
        );
        assert_eq!(download_file_name("? Quiz ?"), "quiz_presentation.pptx");
    }

    #[test]
    fn download_name_drops_path_characters() {
        assert_eq!(
            download_file_name("CI/CD: what? why!"),
            "cicd_what_why!_presentation.pptx"
        );
        assert!(!download_file_name("../../etc/passwd").contains('/'));
    }

    #[test]
    fn download_name_for_empty_topic() {
        assert_eq!(download_file_name("   "), "presentation.pptx");
        assert_eq!(download_file_name("???"), "presentation.pptx");
    }

    #[test]
    fn default_models() {
        assert_eq!(default_model("gemini"), "gemini-2.0-flash");
        assert_eq!(default_model("openai"), "gpt-4.1-mini");
        assert_eq!(default_model("mystery"), "gemini-2.0-flash");
    }

    #[test]
    fn injected_client_wins() {
        use crate::pipeline::llm::Completion;

        struct Fixed;
        #[async_trait::async_trait]
        impl CompletionClient for Fixed {
            async fn complete(&self, _prompt: &str) -> Result<Completion, DeckError> {
                Ok(Completion::text("[]"))
            }
        }
        let client: Arc<dyn CompletionClient> = Arc::new(Fixed);
        let config = GenerationConfig::builder()
            .client(Arc::clone(&client))
            .provider_name("definitely-not-a-provider")
            .build()
            .unwrap();
        let resolved = resolve_client(&config).unwrap();
        assert!(Arc::ptr_eq(&resolved, &client));
    }

    #[test]
    fn write_atomically_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deck.pptx");
        write_atomically(&path, b"first").unwrap();
        write_atomically(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
