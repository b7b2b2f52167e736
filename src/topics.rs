//! Reading course titles from a plain text list.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::constants::DEFAULT_TOPICS_FILE;
use crate::error::ThumbnailError;

#[allow(clippy::unwrap_used)] // constant pattern
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:[.)]|\s|$)\s*").unwrap());

/// Drops a leading list number such as `1.`, `2)` or `3 `. Four digit
/// numbers are kept so years survive, and so is the `3` of `3D`.
pub fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start();
    match LIST_MARKER.find(line) {
        Some(marker) => &line[marker.end()..],
        None => line,
    }
}

/// One title per line; blank lines are skipped and list numbers are
/// stripped with [`strip_list_marker`]. Order is preserved.
pub fn parse_topics(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| strip_list_marker(line).trim().to_string())
        .filter(|topic| !topic.is_empty())
        .collect()
}

/// Reads and parses a topic file, refusing missing files and files with no
/// usable titles.
pub fn read_topics(path: &Path) -> Result<Vec<String>, ThumbnailError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ThumbnailError::Input(format!(
                "File '{}' not found! Create it with your course names (one per line)",
                path.display()
            )));
        }
        Err(err) => {
            return Err(ThumbnailError::Input(format!(
                "Failed to read {}: {err}",
                path.display()
            )));
        }
    };

    let topics = parse_topics(&content);
    if topics.is_empty() {
        return Err(ThumbnailError::Input(format!(
            "No course names found in '{}'. Add your course names to the file (one per line)",
            path.display()
        )));
    }
    debug!("Read {} topics from {}", topics.len(), path.display());
    Ok(topics)
}

/// Topics for one run and the file they came from, if any.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoadedTopics {
    /// Titles in run order
    pub topics: Vec<String>,
    /// Set when the titles were read from a file
    pub file: Option<PathBuf>,
}

/// Topics given directly win; otherwise `file` (or `course.txt`) is read.
pub fn load_topics(
    given: &[String],
    file: Option<&Path>,
) -> Result<LoadedTopics, ThumbnailError> {
    let topics: Vec<String> = given
        .iter()
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty())
        .collect();
    if !topics.is_empty() {
        return Ok(LoadedTopics { topics, file: None });
    }

    let path = file.map_or_else(|| PathBuf::from(DEFAULT_TOPICS_FILE), Path::to_path_buf);
    let topics = read_topics(&path)?;
    Ok(LoadedTopics {
        topics,
        file: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_list_with_blank_line() {
        assert_eq!(
            parse_topics("1. Topic A\n\n2. Topic B\n"),
            vec!["Topic A".to_string(), "Topic B".to_string()]
        );
    }

    #[test]
    fn markers_and_whitespace() {
        let content = "  3) Excel for Finance  \r\n\t\n10 Negotiation\nPublic Speaking\n42\n";
        assert_eq!(
            parse_topics(content),
            vec![
                "Excel for Finance".to_string(),
                "Negotiation".to_string(),
                "Public Speaking".to_string(),
            ]
        );
    }

    #[test]
    fn years_are_not_list_numbers() {
        assert_eq!(
            parse_topics("2024 Tax Update\n5 2024 Tax Update"),
            vec!["2024 Tax Update".to_string(), "2024 Tax Update".to_string()]
        );
    }

    #[test]
    fn digits_glued_to_a_word_are_kept() {
        assert_eq!(
            parse_topics("3D Printing\n4. 3D Modeling"),
            vec!["3D Printing".to_string(), "3D Modeling".to_string()]
        );
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_topics(&dir.path().join("course.txt")).expect_err("should fail");
        assert!(matches!(err, ThumbnailError::Input(ref msg) if msg.contains("not found")));
    }

    #[test]
    fn empty_file_is_an_input_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("course.txt");
        std::fs::write(&path, "\n   \n1.\n").expect("write");
        let err = read_topics(&path).expect_err("should fail");
        assert!(matches!(err, ThumbnailError::Input(ref msg) if msg.contains("No course names")));
    }

    #[test]
    fn reads_file_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("course.txt");
        std::fs::write(&path, "1 Rust\n2 Go\n3 Zig\n").expect("write");
        assert_eq!(
            read_topics(&path).expect("topics"),
            vec!["Rust".to_string(), "Go".to_string(), "Zig".to_string()]
        );
    }

    #[test]
    fn given_topics_skip_the_file() {
        let given = vec!["  Rust ".to_string(), " ".to_string()];
        let loaded = load_topics(&given, Some(Path::new("/definitely/missing.txt")))
            .expect("topics");
        assert_eq!(loaded.topics, vec!["Rust".to_string()]);
        assert_eq!(loaded.file, None);
    }

    #[test]
    fn blank_given_topics_fall_back_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("list.txt");
        std::fs::write(&path, "1. Go\n").expect("write");
        let loaded = load_topics(&["".to_string()], Some(&path)).expect("topics");
        assert_eq!(loaded.topics, vec!["Go".to_string()]);
        assert_eq!(loaded.file, Some(path));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_topics(&[], Some(&dir.path().join("nope.txt"))).expect_err("should fail");
        assert!(matches!(err, ThumbnailError::Input(_)));
    }
}
