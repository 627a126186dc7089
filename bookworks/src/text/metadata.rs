//! Document title extraction.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Metadata;

static TITLE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());

/// Text of the first level-1 heading, if any.
pub fn find_title(content: &str) -> Option<&str> {
    TITLE_HEADING
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Metadata for `content`, falling back to the untitled sentinel.
pub fn extract_metadata(content: &str) -> Metadata {
    match find_title(content) {
        Some(title) => Metadata {
            title: title.to_string(),
            ..Metadata::default()
        },
        None => {
            log::warn!("No level-1 heading found, using default title");
            Metadata::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_heading_wins() {
        let content = "intro\n# First\ntext\n# Second";
        assert_eq!(extract_metadata(content).title, "First");
    }

    #[test]
    fn test_level_two_heading_ignored() {
        assert_eq!(find_title("## Section\nbody"), None);
        assert_eq!(extract_metadata("## Section").title, "Untitled Document");
    }

    #[test]
    fn test_heading_requires_space() {
        assert_eq!(find_title("#NoSpace"), None);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(extract_metadata(""), Metadata::default());
    }
}
