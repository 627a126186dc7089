use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookworksError {
    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unsupported input type: {} (expected .md, .markdown, .txt or .epub)", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("{tool} not found. Install it or set its path in the config file.")]
    ToolNotFound { tool: String },

    #[error("{0}")]
    ConversionFailed(String),

    #[error("EPUB error: {0}")]
    Epub(String),

    #[error("Speech synthesis unavailable: {0}")]
    SynthesisUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BookworksError>;
