//! Mock converter for testing
//!
//! Writes a placeholder file instead of running an external tool, or fails
//! with a configured message.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ConvertOptions, Converter};
use crate::error::{BookworksError, Result};

/// Contents written to every successful `convert` output.
pub const PLACEHOLDER_OUTPUT: &[u8] = b"mock converter output";

/// A single recorded `convert` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertCall {
    pub input: PathBuf,
    pub output: PathBuf,
    pub options: ConvertOptions,
}

/// A converter that never leaves the process
pub struct MockConverter {
    /// Error message to fail with (None = always succeed)
    fail_with: Option<String>,
    /// Markdown returned by `to_markdown`
    markdown: String,
    call_count: AtomicUsize,
    calls: Mutex<Vec<ConvertCall>>,
}

impl MockConverter {
    /// Create a converter that always succeeds
    pub fn succeeds() -> Self {
        Self {
            fail_with: None,
            markdown: String::new(),
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a converter that always fails with `message`
    pub fn fails(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::succeeds()
        }
    }

    /// Set the Markdown returned by `to_markdown`
    pub fn with_markdown(mut self, markdown: &str) -> Self {
        self.markdown = markdown.to_string();
        self
    }

    /// Number of `convert` and `to_markdown` calls so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Recorded `convert` calls, oldest first
    pub fn calls(&self) -> Vec<ConvertCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn check_failure(&self) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(BookworksError::ConversionFailed(message.clone())),
            None => Ok(()),
        }
    }
}

impl Converter for MockConverter {
    fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(ConvertCall {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                options: options.clone(),
            });
        }
        self.check_failure()?;
        std::fs::write(output, PLACEHOLDER_OUTPUT)?;
        Ok(())
    }

    fn to_markdown(&self, _input: &Path) -> Result<String> {
        self.check_failure()?;
        Ok(self.markdown.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
