//! Turning course titles into file names.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{FALLBACK_FILE_STEM, MAX_FILENAME_LEN, THUMBNAIL_EXTENSION};

#[allow(clippy::unwrap_used)] // constant pattern
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());

#[allow(clippy::unwrap_used)] // constant pattern
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercases the topic, keeps only `[a-z0-9-]`, turns whitespace runs into
/// single hyphens and cuts the result to [`MAX_FILENAME_LEN`] characters.
///
/// Distinct topics may map to the same name; the later file wins.
pub fn sanitize_filename(topic: &str) -> String {
    let lowered = topic.trim().to_lowercase();
    let kept = DISALLOWED.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(kept.trim(), "-");
    hyphenated.chars().take(MAX_FILENAME_LEN).collect()
}

/// Where the thumbnail for `topic` ends up inside `output_dir`.
pub fn output_path(output_dir: &Path, topic: &str) -> PathBuf {
    let mut stem = sanitize_filename(topic);
    if stem.is_empty() {
        stem = FALLBACK_FILE_STEM.to_string();
    }
    output_dir.join(format!("{stem}.{THUMBNAIL_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_safe_chars(name: &str) -> bool {
        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn basic_sanitize() {
        assert_eq!(
            sanitize_filename("Machine Learning Fundamentals"),
            "machine-learning-fundamentals"
        );
        assert_eq!(sanitize_filename("C++ & Rust: 101!"), "c-rust-101");
        assert_eq!(sanitize_filename("  Spaced   Out\tTitle "), "spaced-out-title");
    }

    #[test]
    fn truncates_to_fifty() {
        let long = "word ".repeat(40);
        let name = sanitize_filename(&long);
        assert_eq!(name.len(), MAX_FILENAME_LEN);
        assert!(only_safe_chars(&name));
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(sanitize_filename("Café Déjà Vu"), "caf-dj-vu");
    }

    #[test]
    fn sanitize_is_idempotent() {
        for topic in [
            "Effective Business Communication",
            "Data-Driven  Decisions (2024 Edition)",
            "   ",
            "Ünïcödé Tïtle with émojis 🚀🚀",
            &"x y ".repeat(30),
        ] {
            let once = sanitize_filename(topic);
            assert_eq!(sanitize_filename(&once), once);
            assert!(only_safe_chars(&once), "{once}");
            assert!(once.chars().count() <= MAX_FILENAME_LEN);
        }
    }

    #[test]
    fn output_path_uses_png_and_fallback() {
        let dir = Path::new("/tmp/thumbs");
        assert_eq!(
            output_path(dir, "Python Basics"),
            dir.join("python-basics.png")
        );
        assert_eq!(output_path(dir, "!!!"), dir.join("thumbnail.png"));
    }
}
