//! Speech preparation: strip markup, split into chapters and chunks, and
//! write the results as text files for a TTS engine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_CHUNK_SIZE, SpeechConfig};
use crate::error::Result;
use crate::text::{
    Pass, Pipeline, SplitStrategy, StripOptions, chunk_content, sanitize_filename, split_chapters,
};

/// Options for one speech run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechOptions {
    pub book_title: String,
    /// Split into chapters (and chunks) instead of one file per book
    pub split_chapters: bool,
    /// 0 disables chunking
    pub max_chunk_size: usize,
    pub min_chunk_size: usize,
    pub strategy: SplitStrategy,
    pub strip: StripOptions,
    /// Reflow paragraphs before stripping
    pub reflow: bool,
}

impl SpeechOptions {
    pub fn new(book_title: impl Into<String>) -> Self {
        Self {
            book_title: book_title.into(),
            split_chapters: false,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            strategy: SplitStrategy::default(),
            strip: StripOptions::default(),
            reflow: true,
        }
    }

    pub fn from_config(book_title: impl Into<String>, config: &SpeechConfig) -> Self {
        Self {
            book_title: book_title.into(),
            split_chapters: config.split_chapters,
            max_chunk_size: config.max_chunk_size,
            min_chunk_size: config.min_chunk_size,
            strategy: config.strategy,
            strip: StripOptions {
                flatten_inline_code: config.flatten_inline_code,
                unwrap_bracket_text: config.unwrap_bracket_text,
                remove_all_backslashes: config.remove_all_backslashes,
                strip_leading_boilerplate: config.strip_leading_boilerplate,
            },
            reflow: config.reflow,
        }
    }
}

/// A chapter ready for synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechChapter {
    /// 1-based position in the book
    pub number: usize,
    pub title: String,
    /// At least one chunk, in document order
    pub chunks: Vec<String>,
}

/// A whole book prepared for synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechBook {
    pub title: String,
    /// Full stripped text
    pub cleaned: String,
    /// Empty unless chapter splitting was requested
    pub chapters: Vec<SpeechChapter>,
}

/// Prepare `content` for speech.
pub fn prepare(content: &str, options: &SpeechOptions) -> SpeechBook {
    let text = if options.reflow {
        Pipeline::publish().run(content)
    } else {
        Pipeline::new(vec![Pass::NormalizeLineEndings]).run(content)
    };
    let cleaned = Pipeline::speech(&options.strip).run(&text);

    let chapters = if options.split_chapters {
        split_chapters(&cleaned, &options.book_title, options.strategy)
            .into_iter()
            .enumerate()
            .map(|(i, chapter)| {
                let chunks =
                    chunk_content(&chapter.content, options.max_chunk_size, options.min_chunk_size);
                warn_oversized(&chapter.title, &chunks, options.max_chunk_size);
                SpeechChapter {
                    number: i + 1,
                    title: chapter.title,
                    chunks,
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    SpeechBook {
        title: options.book_title.clone(),
        cleaned,
        chapters,
    }
}

fn warn_oversized(title: &str, chunks: &[String], max_size: usize) {
    if max_size == 0 {
        return;
    }
    for (i, chunk) in chunks.iter().enumerate() {
        let len = chunk.chars().count();
        if len > max_size {
            log::warn!(
                "\"{}\" part {} is {} chars, over the {} limit, and cannot be split further",
                title,
                i + 1,
                len,
                max_size
            );
        }
    }
}

/// Manifest entry for one chapter (or the whole book when unsplit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub number: usize,
    pub title: String,
    /// File names relative to the output directory
    pub files: Vec<String>,
    pub chars: usize,
}

/// `{title}_manifest.json` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub title: String,
    pub entries: Vec<ManifestEntry>,
}

/// Writes a [`SpeechBook`] into an output directory.
#[derive(Debug, Clone)]
pub struct TtsWriter {
    output_dir: PathBuf,
}

impl TtsWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the manifest written for `book`.
    pub fn manifest_path(&self, book: &SpeechBook) -> PathBuf {
        self.output_dir
            .join(format!("{}_manifest.json", sanitize_filename(&book.title)))
    }

    /// Write the text files and the manifest. Returns the text files in
    /// document order.
    ///
    /// Unsplit books go to `{title}_tts.md`. Chapters go to
    /// `{title}_ch{n}_tts.md`, or to `{title}_ch{n}_part{p}_tts.md` when the
    /// chapter was chunked into more than one part.
    pub fn write(&self, book: &SpeechBook) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;
        let safe_title = sanitize_filename(&book.title);

        let mut files = Vec::new();
        let mut entries = Vec::new();

        if book.chapters.is_empty() {
            let name = format!("{}_tts.md", safe_title);
            files.push(self.write_file(&name, &book.cleaned)?);
            entries.push(ManifestEntry {
                number: 1,
                title: book.title.clone(),
                files: vec![name],
                chars: book.cleaned.chars().count(),
            });
        }

        for chapter in &book.chapters {
            let mut names = Vec::new();
            if chapter.chunks.len() > 1 {
                for (i, chunk) in chapter.chunks.iter().enumerate() {
                    let part = i + 1;
                    let name = format!("{}_ch{}_part{}_tts.md", safe_title, chapter.number, part);
                    let body = format!("# {} (Part {})\n\n{}", chapter.title, part, chunk);
                    files.push(self.write_file(&name, &body)?);
                    names.push(name);
                }
            } else {
                let name = format!("{}_ch{}_tts.md", safe_title, chapter.number);
                let body = chapter.chunks.first().map(String::as_str).unwrap_or_default();
                files.push(self.write_file(&name, body)?);
                names.push(name);
            }

            entries.push(ManifestEntry {
                number: chapter.number,
                title: chapter.title.clone(),
                files: names,
                chars: chapter.chunks.iter().map(|c| c.chars().count()).sum(),
            });
        }

        let manifest = Manifest {
            title: book.title.clone(),
            entries,
        };
        let manifest_path = self.manifest_path(book);
        fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
        log::info!(
            "Wrote {} file(s) and {}",
            files.len(),
            manifest_path.display()
        );

        Ok(files)
    }

    fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(name);
        fs::write(&path, content)?;
        log::debug!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(path)
    }
}
