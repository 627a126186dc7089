//! Markdown to EPUB publishing.
//!
//! The cleaned Markdown and the converter's output live in a temporary
//! workspace until the conversion succeeds, so a failed build leaves nothing
//! behind in the output directory.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{Config, DEFAULT_AUTHOR};
use crate::convert::{ConvertOptions, Converter};
use crate::error::{BookworksError, Result};
use crate::text::{clean_markdown, sanitize_filename};

/// Options for one EPUB build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    pub author: String,
    pub output_dir: PathBuf,
    pub toc: bool,
    pub toc_depth: u8,
    pub chapter_level: Option<u8>,
    pub standalone: bool,
    /// Keep `{title}_processed.md` next to the EPUB
    pub keep_intermediate: bool,
    /// Publication date, today when unset
    pub date: Option<String>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            output_dir: PathBuf::from("."),
            toc: true,
            toc_depth: 3,
            chapter_level: Some(2),
            standalone: true,
            keep_intermediate: false,
            date: None,
        }
    }
}

impl PublishOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            author: config.author.clone(),
            output_dir: config.output_dir(),
            toc: config.publish.toc,
            toc_depth: config.publish.toc_depth,
            chapter_level: Some(config.publish.chapter_level),
            standalone: config.publish.standalone,
            keep_intermediate: config.publish.keep_intermediate,
            date: None,
        }
    }
}

/// Today's date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Clean `content` and build `{title}.epub` in `options.output_dir`.
///
/// Returns the path of the written EPUB.
pub fn publish(
    content: &str,
    options: &PublishOptions,
    converter: &dyn Converter,
) -> Result<PathBuf> {
    let (cleaned, mut metadata) = clean_markdown(content);
    metadata.author = Some(options.author.clone());
    metadata.date = Some(options.date.clone().unwrap_or_else(today));

    let safe_title = sanitize_filename(&metadata.title);
    let workspace = TempDir::new()?;
    let processed = workspace.path().join(format!("{}_processed.md", safe_title));
    fs::write(&processed, &cleaned)?;
    log::debug!("Wrote {}", processed.display());

    let built = workspace.path().join(format!("{}.epub", safe_title));
    let convert_options = ConvertOptions {
        metadata,
        toc: options.toc,
        toc_depth: options.toc_depth,
        chapter_level: options.chapter_level,
        standalone: options.standalone,
    };
    converter.convert(&processed, &built, &convert_options)?;

    fs::create_dir_all(&options.output_dir)?;
    let output = options.output_dir.join(format!("{}.epub", safe_title));
    move_file(&built, &output)?;
    log::info!("Wrote {}", output.display());

    if options.keep_intermediate {
        let kept = options
            .output_dir
            .join(format!("{}_processed.md", safe_title));
        move_file(&processed, &kept)?;
        log::info!("Kept intermediate {}", kept.display());
    }

    Ok(output)
}

/// Read a Markdown file and [`publish`] it.
pub fn publish_file(
    path: &Path,
    options: &PublishOptions,
    converter: &dyn Converter,
) -> Result<PathBuf> {
    if !path.exists() {
        return Err(BookworksError::InputNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    publish(&content, options, converter)
}

/// Rename, falling back to copy and delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::MockConverter;

    fn options(dir: &Path) -> PublishOptions {
        PublishOptions {
            output_dir: dir.join("out"),
            date: Some("2024-03-12".to_string()),
            ..PublishOptions::default()
        }
    }

    #[test]
    fn test_publish_writes_epub() {
        let dir = TempDir::new().unwrap();
        let converter = MockConverter::succeeds();

        let output = publish("# My Book\nLine one.\nLine two.", &options(dir.path()), &converter).unwrap();

        assert_eq!(output, dir.path().join("out").join("My Book.epub"));
        assert!(output.exists());
        assert!(!dir.path().join("out").join("My Book_processed.md").exists());

        let calls = converter.calls();
        assert_eq!(calls.len(), 1);
        let metadata = &calls[0].options.metadata;
        assert_eq!(metadata.title, "My Book");
        assert_eq!(metadata.author.as_deref(), Some("Author Not Specified"));
        assert_eq!(metadata.date.as_deref(), Some("2024-03-12"));
        assert!(calls[0].input.ends_with("My Book_processed.md"));
    }

    #[test]
    fn test_publish_sanitizes_title() {
        let dir = TempDir::new().unwrap();
        let converter = MockConverter::succeeds();

        let output = publish("# Part 1: Why/How?\nText", &options(dir.path()), &converter).unwrap();
        assert_eq!(output.file_name().unwrap(), "Part 1- Why-How.epub");
        assert_eq!(converter.calls()[0].options.metadata.title, "Part 1: Why/How?");
    }

    #[test]
    fn test_keep_intermediate() {
        let dir = TempDir::new().unwrap();
        let converter = MockConverter::succeeds();
        let opts = PublishOptions {
            keep_intermediate: true,
            ..options(dir.path())
        };

        publish("# Kept\nFirst.\nSecond.", &opts, &converter).unwrap();

        let kept = dir.path().join("out").join("Kept_processed.md");
        assert_eq!(
            fs::read_to_string(kept).unwrap(),
            "# Kept\nFirst.\n\nSecond."
        );
    }

    #[test]
    fn test_failure_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let converter = MockConverter::fails("Pandoc error: could not parse");

        let err = publish("# Broken\nText", &options(dir.path()), &converter).unwrap_err();

        assert_eq!(err.to_string(), "Pandoc error: could not parse");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_untitled_document() {
        let dir = TempDir::new().unwrap();
        let converter = MockConverter::succeeds();

        let output = publish("no heading here", &options(dir.path()), &converter).unwrap();
        assert!(output.ends_with("Untitled Document.epub"));
    }

    #[test]
    fn test_publish_file_missing() {
        let dir = TempDir::new().unwrap();
        let converter = MockConverter::succeeds();

        let err = publish_file(&dir.path().join("nope.md"), &options(dir.path()), &converter)
            .unwrap_err();
        assert!(matches!(err, BookworksError::InputNotFound(_)));
        assert_eq!(converter.call_count(), 0);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.author = "Jane".to_string();
        config.publish.toc = false;
        config.publish.keep_intermediate = true;

        let opts = PublishOptions::from_config(&config);
        assert_eq!(opts.author, "Jane");
        assert!(!opts.toc);
        assert!(opts.keep_intermediate);
        assert_eq!(opts.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_today_format() {
        let date = today();
        assert_eq!(date.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());
    }
}
