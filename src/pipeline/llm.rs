//! Completion service: send the outline prompt and return the raw reply.
//!
//! [`CompletionClient`] is the seam between the pipeline and whatever
//! produces text. The production implementation, [`LlmCompletionClient`],
//! wraps an `edgequake_llm` provider; tests substitute a scripted client.
//!
//! The client is built once per process and shared read-only. There is no
//! retry here or anywhere upstream: a failed call is reported as
//! [`DeckError::Service`] and the request ends without an artifact.

use crate::config::GenerationConfig;
use crate::error::DeckError;
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Text returned by one completion call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    /// Token counts when the service reports them, else 0.
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Anything that turns a prompt into text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// # Errors
    /// [`DeckError::Service`] for any failure of the underlying service.
    async fn complete(&self, prompt: &str) -> Result<Completion, DeckError>;
}

/// [`CompletionClient`] backed by an `edgequake_llm` chat provider.
///
/// Each call sends two messages: the system prompt (configured override or
/// [`DEFAULT_SYSTEM_PROMPT`]) and the outline request as the user turn.
pub struct LlmCompletionClient {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    options: CompletionOptions,
}

impl LlmCompletionClient {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            options: build_options(config),
        }
    }
}

#[async_trait]
impl CompletionClient for LlmCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, DeckError> {
        let start = Instant::now();
        let messages = vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(prompt),
        ];

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| DeckError::Service {
                detail: format!("{e}"),
            })?;

        debug!(
            "Completion: {} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        Ok(Completion {
            text: response.content,
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}

/// Build `CompletionOptions` from the generation config.
fn build_options(config: &GenerationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = GenerationConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.7));
        assert_eq!(opts.max_tokens, Some(4096));
    }

    #[test]
    fn build_options_follow_builder() {
        let config = GenerationConfig::builder()
            .temperature(0.2)
            .max_tokens(1000)
            .build()
            .unwrap();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(1000));
    }

    #[test]
    fn completion_text_helper() {
        let c = Completion::text("[]");
        assert_eq!(c.text, "[]");
        assert_eq!(c.input_tokens, 0);
    }
}
