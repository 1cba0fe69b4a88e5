//! In-memory presentation model produced by the assembler and consumed by
//! the PPTX writer.
//!
//! Every text region carries an explicit [`RegionRole`] fixed when the
//! region is created. Styling keys off that tag, never off placeholder
//! names, so the two slide layouts cannot disagree about which region is
//! the title.

use crate::style::Rgb;
use serde::Serialize;

/// The two slide templates in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlideLayout {
    /// Centered title plus subtitle.
    Title,
    /// Title plus a bulleted body.
    Content,
}

/// Which placeholder a text region fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionRole {
    Title,
    Subtitle,
    Body,
}

/// Paragraph alignment. Deck text is always left-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Alignment {
    #[default]
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Font {
    pub family: String,
    pub size_pt: u32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub text: String,
    /// `None` until the assembler applies the deck style.
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub alignment: Alignment,
    /// Outline level; the assembler only produces level 0.
    pub level: u8,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            alignment: Alignment::default(),
            level: 0,
            runs: vec![Run {
                text: text.into(),
                font: None,
            }],
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRegion {
    pub role: RegionRole,
    pub word_wrap: bool,
    pub paragraphs: Vec<Paragraph>,
}

impl TextRegion {
    pub fn new(role: RegionRole) -> Self {
        Self {
            role,
            word_wrap: false,
            paragraphs: Vec::new(),
        }
    }

    /// A region holding a single paragraph. An empty string still yields one
    /// (empty) run so the placeholder keeps a styled paragraph.
    pub fn with_text(role: RegionRole, text: impl Into<String>) -> Self {
        Self {
            role,
            word_wrap: false,
            paragraphs: vec![Paragraph::plain(text)],
        }
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs.iter().flat_map(|p| p.runs.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub layout: SlideLayout,
    pub regions: Vec<TextRegion>,
}

impl Slide {
    pub fn region(&self, role: RegionRole) -> Option<&TextRegion> {
        self.regions.iter().find(|r| r.role == role)
    }
}

/// A finished presentation, ready to serialise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Document {
    pub slides: Vec<Slide>,
}

impl Document {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}
