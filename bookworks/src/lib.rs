//! Book text tooling for the bookworks workspace
//!
//! Turns Markdown (or EPUB converted to Markdown) into:
//! - publish-ready Markdown handed to pandoc for an EPUB build
//! - speech-ready prose, optionally split into chapters and size-bounded chunks
//!
//! Every text pass is a pure function over `&str`. File and process I/O lives
//! in [`convert`], [`publish`] and [`speech`].

pub mod config;
pub mod convert;
pub mod document;
pub mod epub;
pub mod error;
pub mod publish;
pub mod speech;
pub mod text;
pub mod tts;

pub use config::Config;
pub use convert::{
    ConvertOptions, Converter, EpubReader, MockConverter, PandocConverter, load_document,
};
pub use document::{Chapter, Document, Metadata, UNTITLED_DOCUMENT};
pub use error::{BookworksError, Result};
pub use publish::{PublishOptions, publish, publish_file};
pub use speech::{SpeechBook, SpeechChapter, SpeechOptions, TtsWriter, prepare};
pub use text::{
    Pass, Pipeline, SplitStrategy, StripOptions, chunk_content, clean_markdown, sanitize_filename,
    split_chapters, strip_for_speech,
};
pub use tts::{AudioSegment, SynthesisOptions, TtsBackend, UnimplementedBackend};
