//! CLI binary for edgequake-topic2pptx.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `DeckRequest` + `GenerationConfig`, shows a spinner while the model
//! works and prints the slide preview.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_topic2pptx::{
    generate_with_client, preview_text, resolve_client, BracketScan, DeckRequest, GeneratedDeck,
    GenerationConfig, GenerationProgressCallback, ProgressCallback, Purpose, SlideSize, Stage,
    StyleProfile, DEFAULT_OUTPUT_PATH,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner on stderr that shows the current stage and logs each finished
/// stage with its duration.
struct CliProgressCallback {
    bar: ProgressBar,
}

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}";

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Arc<Self> {
        bar.set_prefix("Preparing");
        Arc::new(Self { bar })
    }

    /// Stop the spinner when generation ends without a deck.
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_generation_start(&self, topic: &str, slide_count: u32) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating {slide_count} slides on \"{topic}\"…"))
        ));
        self.bar.set_prefix("Generating");
    }

    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        // Only the model call takes long enough to be worth a line.
        if stage == Stage::Completion {
            self.bar.println(format!(
                "  {} {}  {}",
                green("✓"),
                stage,
                dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
            ));
        }
    }

    fn on_fallback(&self) {
        self.bar.println(format!(
            "  {} {}",
            yellow("⚠"),
            yellow("Could not parse the model's outline; writing a placeholder deck"),
        ));
    }

    fn on_generation_complete(&self, _slides_written: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Five slides for a general audience
  topic2pptx --topic "Intro to AI" --audience "general public" --slides 5

  # Styled, written to a custom path
  topic2pptx --topic "Quarterly Results" --audience executives \
      --purpose business --font Georgia --size large --theme "Deep Purple" \
      -o out/q3.pptx

  # Pick a provider and model explicitly
  topic2pptx --provider openai --model gpt-4.1-mini --topic "Rust" --audience devs

  # Machine-readable result
  topic2pptx --topic "Photosynthesis" --audience "grade 7" --json

STYLES:
  Fonts   Arial, Calibri, Times New Roman, Helvetica, Georgia
  Sizes   small (32/24/18 pt), medium (40/28/20 pt), large (44/32/24 pt)
  Themes  Professional Blue, Forest Green, Classic Gray, Deep Purple, Elegant Black

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred when set)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  TOPIC2PPTX_*            Any flag below, e.g. TOPIC2PPTX_THEME="Forest Green"
"#;

/// Generate a styled PowerPoint deck from a topic using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "topic2pptx",
    version,
    about = "Generate a styled PowerPoint deck from a topic using an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// What the presentation is about.
    #[arg(long, env = "TOPIC2PPTX_TOPIC")]
    topic: String,

    /// Who the presentation is for.
    #[arg(long, env = "TOPIC2PPTX_AUDIENCE")]
    audience: String,

    /// Total number of slides, including the title slide (3–10).
    #[arg(long, env = "TOPIC2PPTX_SLIDES", default_value_t = 5,
          value_parser = clap::value_parser!(u32).range(3..=10))]
    slides: u32,

    /// What the deck is meant to do.
    #[arg(long, env = "TOPIC2PPTX_PURPOSE", value_enum, default_value = "informative")]
    purpose: PurposeArg,

    /// Font family: Arial, Calibri, "Times New Roman", Helvetica, Georgia.
    #[arg(long, env = "TOPIC2PPTX_FONT", default_value = "Arial")]
    font: String,

    /// Size tier: small, medium, large.
    #[arg(long, env = "TOPIC2PPTX_SIZE", default_value = "medium")]
    size: String,

    /// Color theme, e.g. "Professional Blue" or forest-green.
    #[arg(long, env = "TOPIC2PPTX_THEME", default_value = "Professional Blue")]
    theme: String,

    /// Where to write the presentation.
    #[arg(short, long, env = "TOPIC2PPTX_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Use 16:9 slides instead of 4:3.
    #[arg(long, env = "TOPIC2PPTX_WIDESCREEN")]
    widescreen: bool,

    /// LLM model ID (e.g. gemini-2.0-flash, gpt-4.1-mini).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "TOPIC2PPTX_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "TOPIC2PPTX_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "TOPIC2PPTX_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Locate the outline with a nesting-aware scan instead of first `[` to last `]`.
    #[arg(long, env = "TOPIC2PPTX_BALANCED_SCAN")]
    balanced_scan: bool,

    /// Give up on the model after this many seconds.
    #[arg(long, env = "TOPIC2PPTX_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Print a JSON summary (path, file name, preview, stats) instead of text.
    #[arg(long, env = "TOPIC2PPTX_JSON")]
    json: bool,

    /// Do not print the slide preview.
    #[arg(long, env = "TOPIC2PPTX_NO_PREVIEW")]
    no_preview: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TOPIC2PPTX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TOPIC2PPTX_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PurposeArg {
    Informative,
    Persuasive,
    Educational,
    Business,
}

impl From<PurposeArg> for Purpose {
    fn from(v: PurposeArg) -> Self {
        match v {
            PurposeArg::Informative => Purpose::Informative,
            PurposeArg::Persuasive => Purpose::Persuasive,
            PurposeArg::Educational => Purpose::Educational,
            PurposeArg::Business => Purpose::Business,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers INFO-level feedback when it is shown.
    let show_progress = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build request + config ───────────────────────────────────────────
    let style = StyleProfile::from_names(&cli.font, &cli.size, &cli.theme)
        .context("Invalid style selection")?;
    let request = DeckRequest::new(cli.topic.trim(), cli.slides, cli.audience.trim())
        .with_purpose(cli.purpose.clone().into())
        .with_style(style);

    if request.topic.is_empty() {
        anyhow::bail!("--topic must not be empty");
    }
    if request.audience.is_empty() {
        anyhow::bail!("--audience must not be empty");
    }

    let spinner = show_progress.then(CliProgressCallback::new);
    let progress_cb = spinner
        .clone()
        .map(|cb| cb as Arc<dyn GenerationProgressCallback>);

    // ── Run generation ───────────────────────────────────────────────────
    let deck = match run_generation(&cli, &request, progress_cb).await {
        Ok(deck) => deck,
        Err(e) => {
            if let Some(spinner) = &spinner {
                spinner.abandon();
            }
            return Err(e);
        }
    };

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&deck).context("Failed to serialise output")?
        );
        return Ok(());
    }

    if !cli.no_preview && !cli.quiet {
        print!("{}", preview_text(&deck.preview));
    }

    if !cli.quiet {
        let stats = &deck.stats;
        eprintln!(
            "{}  {} slides  {}ms  →  {}",
            if stats.used_fallback { yellow("⚠") } else { green("✔") },
            stats.slides_written,
            stats.total_duration_ms,
            bold(&deck.path.display().to_string()),
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.input_tokens.to_string()),
            dim(&stats.output_tokens.to_string()),
        );
    }

    Ok(())
}

/// Resolve the provider and run one generation under the API timeout.
async fn run_generation(
    cli: &Cli,
    request: &DeckRequest,
    progress: Option<ProgressCallback>,
) -> Result<GeneratedDeck> {
    let config = build_config(cli, progress).await?;
    let client = resolve_client(&config).context("No completion provider available")?;

    let timeout = Duration::from_secs(config.api_timeout_secs);
    tokio::time::timeout(timeout, generate_with_client(request, client.as_ref(), &config))
        .await
        .with_context(|| format!("Gave up after {}s waiting for the model", timeout.as_secs()))?
        .context("Presentation generation failed")
}

/// Map CLI args to `GenerationConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .output_path(&cli.output)
        .api_timeout_secs(cli.api_timeout)
        .slide_size(if cli.widescreen {
            SlideSize::Widescreen
        } else {
            SlideSize::Standard
        })
        .bracket_scan(if cli.balanced_scan {
            BracketScan::Balanced
        } else {
            BracketScan::FirstLast
        });

    if let Some(ref model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abandon_clears_a_running_spinner() {
        let cb = CliProgressCallback::with_bar(ProgressBar::hidden());
        cb.on_generation_start("Intro to AI", 3);
        cb.on_stage_start(Stage::Completion);
        assert!(!cb.bar.is_finished());

        cb.abandon();
        assert!(cb.bar.is_finished());
    }

    #[test]
    fn completion_clears_the_spinner() {
        let cb = CliProgressCallback::with_bar(ProgressBar::hidden());
        cb.on_generation_complete(4);
        assert!(cb.bar.is_finished());
    }
}
