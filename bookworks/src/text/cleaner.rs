//! Publish-ready Markdown cleaning.

use super::Pipeline;
use super::metadata::extract_metadata;
use crate::document::Metadata;

/// Clean Markdown for publishing and extract its metadata.
///
/// Normalizes line endings, collapses multi-line link text and reflows
/// paragraphs. The title comes from the first level-1 heading of the cleaned
/// text. Total for every input, including the empty string.
pub fn clean_markdown(content: &str) -> (String, Metadata) {
    let cleaned = Pipeline::publish().run(content);
    let metadata = extract_metadata(&cleaned);
    (cleaned, metadata)
}
