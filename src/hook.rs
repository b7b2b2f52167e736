//! Hook text: the short shouty caption rendered on a thumbnail.

use std::sync::LazyLock;

use regex::Regex;

use crate::topics::strip_list_marker;

/// Filler phrases and words stripped from a title before picking the hook.
pub const STOPLIST: &[&str] = &[
    "introduction to",
    "intro to",
    "fundamentals",
    "basics",
    "beginners",
    "beginner",
    "complete",
    "masterclass",
    "course",
    "101",
    "a",
    "an",
    "the",
    "of",
    "and",
    "for",
    "with",
    "in",
    "on",
];

#[allow(clippy::unwrap_used)] // built from STOPLIST, every entry is escaped
static FILLER: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = STOPLIST
        .iter()
        .map(|entry| regex::escape(entry).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
});

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Derives an uppercase hook from a course title.
///
/// Filler from [`STOPLIST`] and a leading list number are dropped. Two words
/// or fewer become `MASTER <words>`, longer titles keep their first three
/// words. If nothing survives the filtering, the whole title is used instead.
pub fn hook_text(topic: &str) -> String {
    let stripped = FILLER.replace_all(strip_list_marker(topic), " ");
    let mut text = collapse_whitespace(&stripped);
    if text.is_empty() {
        text = collapse_whitespace(topic);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let hook = if words.len() <= 2 {
        format!("Master {text}").trim().to_string()
    } else {
        words[..3].join(" ")
    };
    hook.to_uppercase()
}
