//! Plain records passed between the text passes.

use serde::{Deserialize, Serialize};

/// Title used when a document has no level-1 heading.
pub const UNTITLED_DOCUMENT: &str = "Untitled Document";

/// A source document held in memory as a whole string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Raw text, Markdown after any EPUB conversion
    pub text: String,
    /// Declared title (EPUB metadata, CLI flag)
    pub title: Option<String>,
    /// Declared author
    pub author: Option<String>,
    /// Declared publication date
    pub date: Option<String>,
}

impl Document {
    /// Wrap raw text with no declared metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the declared title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the declared author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Declared metadata, titled `fallback_title` when no title was declared.
    pub fn metadata(&self, fallback_title: &str) -> Metadata {
        Metadata {
            title: self.title.clone().unwrap_or_else(|| fallback_title.to_string()),
            author: self.author.clone(),
            date: self.date.clone(),
        }
    }
}

/// Metadata extracted by a cleaning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: UNTITLED_DOCUMENT.to_string(),
            author: None,
            date: None,
        }
    }
}

impl Metadata {
    /// Key/value pairs for every field that is present, in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let mut entries = vec![("title", self.title.as_str())];
        if let Some(author) = &self.author {
            entries.push(("author", author.as_str()));
        }
        if let Some(date) = &self.date {
            entries.push(("date", date.as_str()));
        }
        entries
    }
}

/// A titled segment of a document, bounded by heading lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metadata_is_untitled() {
        let metadata = Metadata::default();
        assert_eq!(metadata.title, "Untitled Document");
        assert_eq!(metadata.entries(), vec![("title", "Untitled Document")]);
    }

    #[test]
    fn test_metadata_entries_order() {
        let metadata = Metadata {
            title: "Book".to_string(),
            author: Some("Jane Doe".to_string()),
            date: Some("2024-03-12".to_string()),
        };
        assert_eq!(
            metadata.entries(),
            vec![
                ("title", "Book"),
                ("author", "Jane Doe"),
                ("date", "2024-03-12")
            ]
        );
    }

    #[test]
    fn test_document_builder() {
        let doc = Document::new("text").with_title("T").with_author("A");
        assert_eq!(doc.text, "text");
        assert_eq!(doc.title.as_deref(), Some("T"));
        assert_eq!(doc.author.as_deref(), Some("A"));
        assert!(doc.date.is_none());
    }

    #[test]
    fn test_document_metadata() {
        let doc = Document::new("text").with_author("A").with_date("1851-10-18");
        let metadata = doc.metadata("from-file");
        assert_eq!(
            metadata.entries(),
            vec![("title", "from-file"), ("author", "A"), ("date", "1851-10-18")]
        );

        let titled = doc.with_title("Moby Dick").metadata("from-file");
        assert_eq!(titled.title, "Moby Dick");
    }
}
