//! Prompts for LLM-based deck outline generation.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth**: changing the authoring guidelines or the
//!    requested JSON shape requires editing exactly one place.
//!
//! 2. **Testability**: unit tests can inspect prompts directly without
//!    calling a real model, making prompt regressions easy to catch.
//!
//! Callers can override the system prompt via
//! [`crate::config::GenerationConfig::system_prompt`]; the user prompt is
//! always built by [`build_prompt`].

use crate::deck::Purpose;

/// Default system prompt sent ahead of the outline request.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert presentation designer and storyteller.
Answer with a single JSON array and nothing else.
Do NOT wrap the array in ```json fences.
Do NOT add commentary before or after the array."#;

const GUIDELINES: &str = r#"Follow these guidelines for high-impact content:
1. Make the title slide captivating and memorable
2. Each content slide should:
   - Have a clear, action-oriented title
   - Include a thought-provoking subtitle that reinforces the main message
   - Present 3-4 key points with specific examples and data
   - Tell a coherent story that flows from the previous slide
3. Include real-world applications or case studies
4. End with a strong call-to-action or key takeaways

Structure the content to maintain audience engagement through:
- Opening with a hook or surprising fact
- Building narrative tension
- Using concrete examples and statistics
- Including interactive elements or discussion points
- Connecting points to audience's needs and interests"#;

const OUTPUT_SHAPE: &str = r#"Format as a JSON array of objects, one per slide, each with:
{
    "title": "Compelling Title",
    "subtitle": "Engaging Subtitle or Key Message",
    "content": [
        "Detailed point with specific example or data",
        "Real-world application or case study",
        "Actionable insight or key learning"
    ],
    "examples": ["Specific example", "Case study", "Statistic"],
    "image_description": "Detailed description for relevant, impactful image"
}
The first object is the title slide; its first content item is shown as the subtitle."#;

/// Number of content slides to ask for: one slot of `slide_count` goes to
/// the title slide, and at least one content slide is always requested.
pub fn content_slide_count(slide_count: u32) -> u32 {
    slide_count.saturating_sub(1).max(1)
}

/// Build the outline request for one deck.
pub fn build_prompt(topic: &str, slide_count: u32, purpose: Purpose, audience: &str) -> String {
    format!(
        "Create a compelling and engaging presentation outline for '{topic}' \
         with exactly {n} content slides.\n\
         Purpose: {purpose}\n\
         Target Audience: {audience}\n\n\
         {GUIDELINES}\n\n\
         {OUTPUT_SHAPE}",
        topic = topic.trim(),
        n = content_slide_count(slide_count),
        audience = audience.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_request_fields() {
        let p = build_prompt("Intro to AI", 5, Purpose::Educational, "High-school students");
        assert!(p.contains("'Intro to AI'"));
        assert!(p.contains("exactly 4 content slides"));
        assert!(p.contains("Purpose: Educational"));
        assert!(p.contains("Target Audience: High-school students"));
    }

    #[test]
    fn describes_output_shape() {
        let p = build_prompt("Rust", 3, Purpose::Business, "CTOs");
        let fields = ["title", "subtitle", "content", "examples", "image_description"];
        for field in fields {
            assert!(p.contains(&format!("\"{field}\"")), "missing {field}");
        }
        assert!(p.contains("JSON array"));
    }

    #[test]
    fn embeds_authoring_guidelines() {
        let p = build_prompt("Rust", 3, Purpose::Persuasive, "CTOs");
        assert!(p.contains("hook or surprising fact"));
        assert!(p.contains("call-to-action"));
        assert!(p.contains("narrative tension"));
    }

    #[test]
    fn out_of_range_counts_clamp_to_one_content_slide() {
        assert_eq!(content_slide_count(0), 1);
        assert_eq!(content_slide_count(1), 1);
        assert_eq!(content_slide_count(2), 1);
        assert_eq!(content_slide_count(10), 9);
        let prompt = build_prompt("x", 0, Purpose::Informative, "y");
        assert!(prompt.contains("exactly 1 content slides"));
    }
}
