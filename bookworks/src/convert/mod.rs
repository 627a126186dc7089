//! Document conversion seam.
//!
//! The only slow, externally dependent step in the workspace is the document
//! converter. It is reached through the [`Converter`] trait so the publisher
//! and the document loader can run against [`MockConverter`] in tests.

mod mock;
mod pandoc;

pub use mock::MockConverter;
pub use pandoc::PandocConverter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::document::{Document, Metadata};
use crate::error::{BookworksError, Result};

/// Options bundle handed to a converter for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub metadata: Metadata,
    /// Generate a table of contents
    pub toc: bool,
    pub toc_depth: u8,
    /// Heading level that starts a new EPUB chapter
    pub chapter_level: Option<u8>,
    pub standalone: bool,
}

impl ConvertOptions {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            toc: true,
            toc_depth: 3,
            chapter_level: Some(2),
            standalone: true,
        }
    }

    /// Command-line arguments for pandoc, in a stable order.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .metadata
            .entries()
            .into_iter()
            .map(|(key, value)| format!("--metadata={}:{}", key, value))
            .collect();

        if self.toc {
            args.push("--toc".to_string());
            args.push(format!("--toc-depth={}", self.toc_depth));
        }
        if let Some(level) = self.chapter_level {
            args.push(format!("--epub-chapter-level={}", level));
        }
        if self.standalone {
            args.push("--standalone".to_string());
        }
        args
    }
}

/// A document converter.
pub trait Converter {
    /// Convert `input` into `output`, the format following from the output extension.
    fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<()>;

    /// Convert `input` to Markdown text.
    fn to_markdown(&self, input: &Path) -> Result<String>;

    /// Converter name for display
    fn name(&self) -> &'static str;
}

/// How `.epub` inputs are turned into Markdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpubReader {
    /// Through the configured [`Converter`]
    #[default]
    Pandoc,
    /// In-process, see [`crate::epub`]
    Native,
}

impl fmt::Display for EpubReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpubReader::Pandoc => f.write_str("pandoc"),
            EpubReader::Native => f.write_str("native"),
        }
    }
}

impl FromStr for EpubReader {
    type Err = BookworksError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pandoc" => Ok(Self::Pandoc),
            "native" => Ok(Self::Native),
            _ => Err(BookworksError::Config(format!("Unknown EPUB reader: {}", s))),
        }
    }
}

/// Read a source document, converting EPUB to Markdown on the way in.
///
/// `converter` is only needed for `.epub` inputs read with
/// [`EpubReader::Pandoc`].
pub fn load_document(
    path: &Path,
    converter: Option<&dyn Converter>,
    reader: EpubReader,
) -> Result<Document> {
    if !path.exists() {
        return Err(BookworksError::InputNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "md" | "markdown" | "txt" => {
            let text = std::fs::read_to_string(path)?;
            log::debug!("Read {} ({} bytes)", path.display(), text.len());
            Ok(Document::new(text))
        }
        "epub" => match reader {
            EpubReader::Pandoc => {
                let converter = converter.ok_or_else(|| BookworksError::ToolNotFound {
                    tool: "pandoc".to_string(),
                })?;
                log::info!("Converting {} to Markdown with {}", path.display(), converter.name());
                Ok(Document::new(converter.to_markdown(path)?))
            }
            EpubReader::Native => crate::epub::read_epub(path),
        },
        _ => Err(BookworksError::UnsupportedInput(path.to_path_buf())),
    }
}
