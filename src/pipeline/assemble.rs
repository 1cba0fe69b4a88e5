//! Deck assembly: slide records + resolved style → [`Document`].
//!
//! The first record becomes a title-layout slide (title, plus its first
//! bullet as the subtitle). Every remaining record becomes a content-layout
//! slide with one top-level paragraph per bullet. Styling is then applied
//! uniformly to every region of every slide:
//!
//! - word wrap on, left alignment;
//! - every run gets the style's font family and primary color;
//! - point size follows the region's role tag: Title → title size,
//!   Subtitle → subtitle size, anything else → body size.

use crate::deck::SlideRecord;
use crate::document::{
    Alignment, Document, Font, Paragraph, RegionRole, Slide, SlideLayout, TextRegion,
};
use crate::error::DeckError;
use crate::style::ResolvedStyle;
use tracing::debug;

/// Build the styled document for `deck`.
///
/// # Errors
/// [`DeckError::Assembly`] if `deck` is empty or a record has a blank title.
pub fn assemble(deck: &[SlideRecord], style: &ResolvedStyle) -> Result<Document, DeckError> {
    let (first, rest) = deck
        .split_first()
        .ok_or_else(|| DeckError::Assembly("deck has no slide records".into()))?;

    let mut slides = Vec::with_capacity(deck.len());
    slides.push(title_slide(first)?);
    for (i, record) in rest.iter().enumerate() {
        slides.push(content_slide(record, i + 2)?);
    }

    for slide in &mut slides {
        apply_slide_styling(slide, style);
    }

    debug!("Assembled {} slides", slides.len());
    Ok(Document { slides })
}

fn checked_title(record: &SlideRecord, slide_num: usize) -> Result<&str, DeckError> {
    if record.title.trim().is_empty() {
        return Err(DeckError::Assembly(format!("slide {slide_num} has a blank title")));
    }
    Ok(&record.title)
}

fn title_slide(record: &SlideRecord) -> Result<Slide, DeckError> {
    let title = checked_title(record, 1)?;
    let subtitle = record.content.first().map(String::as_str).unwrap_or("");

    Ok(Slide {
        layout: SlideLayout::Title,
        regions: vec![
            TextRegion::with_text(RegionRole::Title, title),
            TextRegion::with_text(RegionRole::Subtitle, subtitle),
        ],
    })
}

fn content_slide(record: &SlideRecord, slide_num: usize) -> Result<Slide, DeckError> {
    let title = checked_title(record, slide_num)?;

    let mut body = TextRegion::new(RegionRole::Body);
    body.paragraphs = record.content.iter().map(Paragraph::plain).collect();

    Ok(Slide {
        layout: SlideLayout::Content,
        regions: vec![TextRegion::with_text(RegionRole::Title, title), body],
    })
}

fn size_for(role: RegionRole, style: &ResolvedStyle) -> u32 {
    match role {
        RegionRole::Title => style.title_size,
        RegionRole::Subtitle => style.subtitle_size,
        RegionRole::Body => style.body_size,
    }
}

fn apply_slide_styling(slide: &mut Slide, style: &ResolvedStyle) {
    for region in &mut slide.regions {
        region.word_wrap = true;
        let font = Font {
            family: style.font_family.clone(),
            size_pt: size_for(region.role, style),
            color: style.primary_color,
        };
        for paragraph in &mut region.paragraphs {
            paragraph.alignment = Alignment::Left;
            for run in &mut paragraph.runs {
                run.font = Some(font.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{resolve, ColorTheme, FontFamily, Rgb, SizeTier, StyleProfile};

    fn style() -> ResolvedStyle {
        resolve(&StyleProfile::new(
            FontFamily::Georgia,
            SizeTier::Large,
            ColorTheme::ForestGreen,
        ))
        .unwrap()
    }

    fn deck() -> Vec<SlideRecord> {
        vec![
            SlideRecord::new("Intro to AI", ["Why it matters", "ignored on title slide"]),
            SlideRecord::new("History", ["1956", "1997", "2012"]),
            SlideRecord::new("Next Steps", ["Try a course"]),
        ]
    }

    #[test]
    fn one_slide_per_record_in_order() {
        let doc = assemble(&deck(), &style()).unwrap();
        assert_eq!(doc.slide_count(), 3);
        let titles: Vec<String> = doc
            .slides
            .iter()
            .map(|s| s.region(RegionRole::Title).unwrap().paragraphs[0].text())
            .collect();
        assert_eq!(titles, vec!["Intro to AI", "History", "Next Steps"]);
    }

    #[test]
    fn title_slide_uses_first_bullet_as_subtitle() {
        let doc = assemble(&deck(), &style()).unwrap();
        let first = &doc.slides[0];
        assert_eq!(first.layout, SlideLayout::Title);
        let sub = first.region(RegionRole::Subtitle).unwrap();
        assert_eq!(sub.paragraphs.len(), 1);
        assert_eq!(sub.paragraphs[0].text(), "Why it matters");
        assert!(first.region(RegionRole::Body).is_none());
    }

    #[test]
    fn title_slide_without_content_has_empty_subtitle() {
        let doc = assemble(&[SlideRecord::new("Only", Vec::<String>::new())], &style()).unwrap();
        let sub = doc.slides[0].region(RegionRole::Subtitle).unwrap();
        assert_eq!(sub.paragraphs[0].text(), "");
    }

    #[test]
    fn content_slides_have_flat_paragraphs() {
        let doc = assemble(&deck(), &style()).unwrap();
        let body = doc.slides[1].region(RegionRole::Body).unwrap();
        assert_eq!(doc.slides[1].layout, SlideLayout::Content);
        let texts: Vec<String> = body.paragraphs.iter().map(Paragraph::text).collect();
        assert_eq!(texts, vec!["1956", "1997", "2012"]);
        assert!(body.paragraphs.iter().all(|p| p.level == 0));
    }

    #[test]
    fn every_run_is_styled_by_role() {
        let style = style();
        let doc = assemble(&deck(), &style).unwrap();
        for slide in &doc.slides {
            for region in &slide.regions {
                assert!(region.word_wrap);
                let expected = match region.role {
                    RegionRole::Title => 44,
                    RegionRole::Subtitle => 32,
                    RegionRole::Body => 24,
                };
                for p in &region.paragraphs {
                    assert_eq!(p.alignment, Alignment::Left);
                }
                for run in region.runs() {
                    let font = run.font.as_ref().expect("run must be styled");
                    assert_eq!(font.family, "Georgia");
                    assert_eq!(font.size_pt, expected);
                    assert_eq!(font.color, Rgb(34, 139, 34));
                }
            }
        }
    }

    #[test]
    fn empty_deck_is_assembly_error() {
        let err = assemble(&[], &style()).unwrap_err();
        assert!(matches!(err, DeckError::Assembly(_)));
    }

    #[test]
    fn blank_title_is_assembly_error() {
        let mut d = deck();
        d[2].title = "   ".into();
        let err = assemble(&d, &style()).unwrap_err();
        assert!(err.to_string().contains("slide 3"));
    }
}
