//! Structured deck content: the request that drives generation and the
//! slide records the completion service is asked to produce.
//!
//! A [`DeckSpec`] is the array recovered from the model's reply. Its first
//! record is the title slide (the first `content` item doubles as the
//! subtitle); every later record becomes one content slide.

use crate::style::StyleProfile;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One slide's content before rendering.
///
/// Field names match the JSON shape requested in the prompt:
/// `title, subtitle, content[], examples[], image_description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Bullet points in display order. Non-string scalars are stringified
    /// on input; `null` items are dropped.
    #[serde(default, deserialize_with = "string_items")]
    pub content: Vec<String>,

    #[serde(default, deserialize_with = "string_items", skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,

    /// Carried through for the preview only; no image is generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
}

impl SlideRecord {
    /// A record with a title and bullets and nothing else.
    pub fn new(
        title: impl Into<String>,
        content: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            content: content.into_iter().map(Into::into).collect(),
            examples: Vec::new(),
            image_description: None,
        }
    }
}

/// The structured array of slide records for one deck.
pub type DeckSpec = Vec<SlideRecord>;

fn string_items<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    let items = Vec::<Value>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .filter_map(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
        .collect())
}

/// What the presentation is for. Only used to steer the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Purpose {
    #[default]
    Informative,
    Persuasive,
    Educational,
    Business,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Purpose::Informative => "Informative",
            Purpose::Persuasive => "Persuasive",
            Purpose::Educational => "Educational",
            Purpose::Business => "Business",
        })
    }
}

/// One generation request as collected by the shell.
///
/// The shell guarantees a non-empty topic and audience and a slide count
/// in 3..=10; the core does not re-validate but never panics on values
/// outside that range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRequest {
    pub topic: String,
    pub slide_count: u32,
    pub purpose: Purpose,
    pub audience: String,
    pub style: StyleProfile,
}

impl DeckRequest {
    pub fn new(topic: impl Into<String>, slide_count: u32, audience: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            slide_count,
            purpose: Purpose::default(),
            audience: audience.into(),
            style: StyleProfile::default(),
        }
    }

    pub fn with_purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    pub fn with_style(mut self, style: StyleProfile) -> Self {
        self.style = style;
        self
    }
}

/// Human-readable listing of a deck: a `Slide N: title` heading per record
/// followed by one `• point` line per bullet.
pub fn preview_text(deck: &[SlideRecord]) -> String {
    let mut out = String::new();
    for (i, slide) in deck.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("Slide {}: {}\n", i + 1, slide.title));
        for point in &slide.content {
            out.push_str(&format!("  • {point}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let json = r#"{
            "title": "Why AI Matters",
            "subtitle": "It is already here",
            "content": ["Point one", "Point two"],
            "examples": ["Spam filters"],
            "image_description": "A robot reading a newspaper"
        }"#;
        let rec: SlideRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.title, "Why AI Matters");
        assert_eq!(rec.subtitle.as_deref(), Some("It is already here"));
        assert_eq!(rec.content, vec!["Point one", "Point two"]);
        assert_eq!(rec.examples, vec!["Spam filters"]);
        assert!(rec.image_description.is_some());
    }

    #[test]
    fn optional_fields_default() {
        let rec: SlideRecord = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert!(rec.content.is_empty());
        assert!(rec.examples.is_empty());
        assert_eq!(rec.subtitle, None);
    }

    #[test]
    fn scalar_items_are_stringified() {
        let rec: SlideRecord =
            serde_json::from_str(r#"{"title": "Stats", "content": ["a", 42, true, null, 1.5]}"#)
                .unwrap();
        assert_eq!(rec.content, vec!["a", "42", "true", "1.5"]);
    }

    #[test]
    fn bare_scalar_content_is_rejected() {
        let res: Result<SlideRecord, _> =
            serde_json::from_str(r#"{"title": "Bad", "content": "not a list"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn missing_title_is_rejected() {
        let res: Result<SlideRecord, _> = serde_json::from_str(r#"{"content": ["x"]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn preview_lists_titles_and_bullets() {
        let deck = vec![
            SlideRecord::new("Intro to AI", ["A gentle tour"]),
            SlideRecord::new("History", ["1956 Dartmouth", "Deep learning boom"]),
        ];
        let text = preview_text(&deck);
        assert!(text.starts_with("Slide 1: Intro to AI\n"));
        assert!(text.contains("Slide 2: History\n"));
        assert!(text.contains("  • Deep learning boom\n"));
    }
}
