use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::convert::EpubReader;
use crate::error::{BookworksError, Result};
use crate::text::SplitStrategy;

pub const DEFAULT_AUTHOR: &str = "Author Not Specified";
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 3000;
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 500;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Author written into EPUB metadata when none is given
    #[serde(default = "default_author")]
    pub author: String,

    /// Where output files go (defaults to the current directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub converter: ConverterConfig,
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_toc_depth() -> u8 {
    3
}

fn default_chapter_level() -> u8 {
    2
}

fn default_max_chunk_size() -> usize {
    DEFAULT_MAX_CHUNK_SIZE
}

fn default_min_chunk_size() -> usize {
    DEFAULT_MIN_CHUNK_SIZE
}

/// `[publish]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Generate a table of contents
    #[serde(default = "default_true")]
    pub toc: bool,

    #[serde(default = "default_toc_depth")]
    pub toc_depth: u8,

    /// Heading level that starts a new EPUB chapter
    #[serde(default = "default_chapter_level")]
    pub chapter_level: u8,

    #[serde(default = "default_true")]
    pub standalone: bool,

    /// Keep the processed Markdown next to the EPUB
    #[serde(default)]
    pub keep_intermediate: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            toc: true,
            toc_depth: default_toc_depth(),
            chapter_level: default_chapter_level(),
            standalone: true,
            keep_intermediate: false,
        }
    }
}

/// `[speech]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Write one file per chapter instead of one file per book
    #[serde(default)]
    pub split_chapters: bool,

    /// Chapters longer than this are chunked (0 disables chunking)
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,

    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    #[serde(default)]
    pub strategy: SplitStrategy,

    /// Turn `` `code` `` spans into plain words
    #[serde(default)]
    pub flatten_inline_code: bool,

    /// Drop everything before the first paragraph that starts with a word
    #[serde(default)]
    pub strip_leading_boilerplate: bool,

    /// Turn leftover `[text]` and `[text]{attrs}` into bare text
    #[serde(default)]
    pub unwrap_bracket_text: bool,

    /// Drop every backslash left after un-escaping
    #[serde(default)]
    pub remove_all_backslashes: bool,

    /// Run paragraph reflow before stripping
    #[serde(default = "default_true")]
    pub reflow: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            split_chapters: false,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            strategy: SplitStrategy::default(),
            flatten_inline_code: false,
            strip_leading_boilerplate: false,
            unwrap_bracket_text: false,
            remove_all_backslashes: false,
            reflow: true,
        }
    }
}

/// `[converter]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Explicit pandoc executable (otherwise looked up in PATH)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pandoc_path: Option<PathBuf>,

    /// How `.epub` inputs become Markdown
    #[serde(default)]
    pub epub_reader: EpubReader,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: default_author(),
            output_dir: None,
            publish: PublishConfig::default(),
            speech: SpeechConfig::default(),
            converter: ConverterConfig::default(),
        }
    }
}

impl Config {
    /// Get the config file path: `<config dir>/bookworks/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| BookworksError::Config("Could not determine config directory".into()))?;
        Ok(base.join("bookworks").join("config.toml"))
    }

    /// Load config from the default location, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Output directory, falling back to the current directory
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
