//! Image prompt construction.
//!
//! The hook text is the one string the model is allowed to render; the course
//! title is only passed along as mood.

use std::sync::LazyLock;

use rand::{Rng, RngExt};
use regex::Regex;

/// Brands whose logos keep sneaking into generated thumbnails.
pub const FORBIDDEN_BRANDS: &[&str] = &[
    "YouTube",
    "TED",
    "Microsoft",
    "Python",
    "Google",
    "Apple",
    "Udemy",
    "Coursera",
    "LinkedIn",
    "Netflix",
];

#[allow(clippy::unwrap_used)] // built from FORBIDDEN_BRANDS, every entry is escaped
static BRAND: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = FORBIDDEN_BRANDS
        .iter()
        .map(|brand| regex::escape(brand))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
});

/// UI artefacts copied from video platforms that should never be drawn.
const UI_ARTIFACTS: &[&str] = &[
    "play button",
    "progress bar",
    "timestamp",
    "video duration",
    "view counter",
    "playlist badge",
    "subscribe button",
    "share icon",
    "menu",
    "carousel dots",
    "profile chip",
    "watermark",
    "corner tag",
    "subtitles",
    "extra text",
];

/// Layout families a thumbnail can be drawn in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PromptTemplate {
    /// Text on one side, portrait on the other
    SplitPortrait,
    /// Large text over a loud gradient, subject in the lower corner
    BoldGradient,
    /// Dark studio backdrop with a lit subject and neon text
    StudioSpotlight,
}

impl PromptTemplate {
    /// Every template, in a stable order.
    pub const ALL: [PromptTemplate; 3] = [
        PromptTemplate::SplitPortrait,
        PromptTemplate::BoldGradient,
        PromptTemplate::StudioSpotlight,
    ];

    /// Picks a template from the supplied random source.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    fn composition(self) -> &'static str {
        match self {
            PromptTemplate::SplitPortrait => {
                "- Text on one side, person on the other; clear separation between them
- Vibrant, colorful background (solid or subtle gradient) with strong contrast
- Big bold typography; subtle outline or shadow allowed for readability"
            }
            PromptTemplate::BoldGradient => {
                "- Oversized text across the upper two thirds, person in the lower corner, never overlapping the text
- Saturated two-color diagonal gradient background with high contrast against the text
- Heavy condensed sans-serif typography with a thin dark outline"
            }
            PromptTemplate::StudioSpotlight => {
                "- Person lit by a soft key light against a dark studio backdrop, text placed in the empty half
- Deep background with one bright accent color that the text picks up
- Clean geometric typography with a gentle glow for readability"
            }
        }
    }
}

/// The course title with brand names cut out, for use as mood context.
fn mood_title(topic: &str) -> String {
    BRAND
        .replace_all(topic, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the instruction sent to the image model. Brand names only reach
/// the prompt if the hook itself carries them.
pub fn build_prompt(topic: &str, hook_text: &str, template: PromptTemplate) -> String {
    format!(
        r#"Design a modern online course thumbnail for a course titled '{topic}' (use it for mood only, do NOT render it) with ONLY two elements:
1) the EXACT hook text: "{hook_text}" (render this as the ONLY text)
2) one professional person portrait (waist-up or headshot) looking at the camera

Composition and style:
{composition}
- Modern, minimal, premium look

Strict constraints:
- Render ONLY this text: "{hook_text}". Do not add any other words, numbers, badges, subtitles, or symbols
- ZERO logos, icons or branding of any kind
- NO timestamps or durations, NO counters, NO watermarks, NO corner tags
- NO UI elements: buttons, menus, share icons, play buttons, dots, progress bars, carousels, profile chips
- NO random small or fake text anywhere

Content rules:
- Exactly one person; business-casual attire; friendly, confident expression
- Keep the layout uncluttered; emphasize the hook text and the person only"#,
        topic = mood_title(topic),
        composition = template.composition(),
    )
}

/// Things the model should steer away from, passed as `negative_prompt`.
pub fn negative_prompt() -> String {
    let logos = FORBIDDEN_BRANDS
        .iter()
        .map(|brand| format!("{brand} logo"))
        .collect::<Vec<_>>();
    let mut parts = vec!["logos".to_string(), "brand marks".to_string()];
    parts.extend(logos);
    parts.extend(UI_ARTIFACTS.iter().map(|item| item.to_string()));
    parts.push("multiple people".to_string());
    parts.push("misspelled text".to_string());
    parts.join(", ")
}
