//! Speech synthesis seam.
//!
//! No engine ships with bookworks. Prepared text files are the hand-off point;
//! a backend implementing [`TtsBackend`] turns them into audio.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_MAX_CHUNK_SIZE;
use crate::error::{BookworksError, Result};

/// Options for synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Voice name or reference audio, backend specific
    pub voice: Option<String>,
    /// Largest text unit sent to the engine in one request
    pub chunk_size: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            voice: None,
            chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

impl SynthesisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    /// Set the chunk size (at least 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

/// One synthesized audio file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSegment {
    pub file_path: PathBuf,
    pub duration_secs: f64,
    pub chapter_title: Option<String>,
    /// Offset of this segment within the whole book
    pub start_secs: f64,
}

/// TTS backend trait - all engines implement this.
pub trait TtsBackend {
    /// Synthesize `text` into an audio file at `output`.
    fn synthesize(
        &self,
        text: &str,
        output: &Path,
        options: &SynthesisOptions,
    ) -> Result<AudioSegment>;

    /// Engine name for display
    fn name(&self) -> &'static str;
}

/// Backend used when no engine is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedBackend;

impl TtsBackend for UnimplementedBackend {
    fn synthesize(
        &self,
        _text: &str,
        output: &Path,
        _options: &SynthesisOptions,
    ) -> Result<AudioSegment> {
        Err(BookworksError::SynthesisUnavailable(format!(
            "no TTS engine configured, cannot write {}",
            output.display()
        )))
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
