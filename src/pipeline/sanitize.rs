//! Sanitizer: recover a slide array from a free-form completion reply.
//!
//! ## Why is sanitizing necessary?
//!
//! Even when told to answer with bare JSON, models regularly wrap the array
//! in ` ```json ` fences, open with "Here is your outline:" or close with a
//! friendly sign-off. The sanitizer strips that noise and parses what is
//! left. If parsing still fails the request is not aborted: a fixed
//! one-slide "Technical Difficulties" deck is returned so the pipeline
//! always yields a renderable document.
//!
//! ## Steps
//!
//! 1. Remove ` ```json ` and ` ``` ` markers outside the first `[` … last
//!    `]` span, trim. Markers inside the span are left to the parser.
//! 2. If the text does not start with `[`, drop everything before the first `[`.
//! 3. If the text does not end with `]`, drop everything after the last `]`.
//! 4. Parse as a JSON array of [`SlideRecord`]s.
//!
//! Steps 2–3 take the span from the *first* `[` to the *last* `]`. When the
//! surrounding prose itself contains brackets this over- or under-captures
//! and the reply falls back. [`BracketScan::Balanced`] is an opt-in scanner
//! that tracks nesting depth and string literals instead.

use crate::deck::{DeckSpec, SlideRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const FALLBACK_TITLE: &str = "Technical Difficulties";

pub const FALLBACK_CONTENT: [&str; 3] = [
    "We apologize for the technical issue.",
    "Please try regenerating the presentation.",
    "If the problem persists, try simplifying your topic.",
];

/// How the JSON array is located inside the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BracketScan {
    /// First `[` to last `]`. (default)
    #[default]
    FirstLast,
    /// First complete top-level array, depth- and string-aware.
    Balanced,
}

/// Why a reply could not be used. Never leaves this module.
#[derive(Debug, Error)]
enum MalformedResponse {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply contains no complete array")]
    NoArray,

    #[error("reply array is empty")]
    Empty,

    #[error("slide {0} has a blank title")]
    BlankTitle(usize),
}

/// Outcome of [`sanitize_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub deck: DeckSpec,
    /// True when the reply was unusable and `deck` is the fallback.
    pub used_fallback: bool,
}

/// The deck returned when a reply cannot be parsed.
pub fn fallback_deck() -> DeckSpec {
    vec![SlideRecord::new(FALLBACK_TITLE, FALLBACK_CONTENT)]
}

/// Turn a raw reply into a non-empty deck. Never fails.
pub fn sanitize(response: &str) -> DeckSpec {
    sanitize_with(response, BracketScan::FirstLast).deck
}

/// [`sanitize`] with a choice of array scanner, reporting whether the
/// fallback deck was used.
pub fn sanitize_with(response: &str, scan: BracketScan) -> Sanitized {
    match parse_deck(response, scan) {
        Ok(deck) => {
            debug!("Sanitized reply into {} slide records", deck.len());
            Sanitized {
                deck,
                used_fallback: false,
            }
        }
        Err(e) => {
            warn!("Failed to clean completion reply, using fallback deck: {e}");
            Sanitized {
                deck: fallback_deck(),
                used_fallback: true,
            }
        }
    }
}

fn parse_deck(response: &str, scan: BracketScan) -> Result<DeckSpec, MalformedResponse> {
    let cleaned = strip_fences(response);
    let candidate = match scan {
        BracketScan::FirstLast => first_last_span(&cleaned),
        BracketScan::Balanced => balanced_span(&cleaned).ok_or(MalformedResponse::NoArray)?,
    };

    let deck: DeckSpec = serde_json::from_str(candidate)?;
    if deck.is_empty() {
        return Err(MalformedResponse::Empty);
    }
    if let Some(i) = deck.iter().position(|r| r.title.trim().is_empty()) {
        return Err(MalformedResponse::BlankTitle(i + 1));
    }
    Ok(deck)
}

/// Remove fence markers around the first `[` … last `]` span. Markers
/// inside the span may belong to string values and are kept.
fn strip_fences(input: &str) -> String {
    fn unfence(s: &str) -> String {
        s.replace("```json", "").replace("```", "")
    }

    match (input.find('['), input.rfind(']')) {
        (Some(start), Some(end)) if start < end => {
            let mut out = unfence(&input[..start]);
            out.push_str(&input[start..=end]);
            out.push_str(&unfence(&input[end + 1..]));
            out.trim().to_string()
        }
        _ => unfence(input).trim().to_string(),
    }
}

/// Cut to the first `[` unless already there, then to the last `]` unless
/// already there. Missing brackets leave the text as is; the parser
/// rejects it.
fn first_last_span(input: &str) -> &str {
    let mut s = input;
    if !s.starts_with('[') {
        if let Some(start) = s.find('[') {
            s = &s[start..];
        }
    }
    if !s.ends_with(']') {
        if let Some(end) = s.rfind(']') {
            s = &s[..=end];
        }
    }
    s
}

/// The first `[` … matching `]` span, ignoring brackets inside JSON string
/// literals.
fn balanced_span(input: &str) -> Option<&str> {
    let start = input.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in input[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&input[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Tests ────────────────────────────────────────────────────────────────────
