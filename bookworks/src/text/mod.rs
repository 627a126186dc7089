//! Text processing: rewrite passes, chapter splitting and chunking.
//!
//! Each rewrite is a named [`Pass`]. Output targets (publishing, speech) are
//! different [`Pipeline`] compositions of the same passes.

pub mod chapters;
pub mod chunker;
mod cleaner;
mod links;
mod metadata;
mod reflow;
mod sanitize;
pub mod strip;

pub use chapters::{SplitStrategy, split_chapters};
pub use chunker::chunk_content;
pub use cleaner::clean_markdown;
pub use links::collapse_multiline_links;
pub use metadata::{extract_metadata, find_title};
pub use reflow::reflow_paragraphs;
pub use sanitize::sanitize_filename;
pub use strip::{StripOptions, strip_for_speech};

/// A single whole-text rewrite step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    NormalizeLineEndings,
    CollapseMultilineLinks,
    ReflowParagraphs,
    RemoveIdMarkers,
    RemoveHtmlBlocks,
    RemoveFencedDivs,
    StripHeadingAttributes,
    RemoveEmptyImages,
    RemoveAttributeSpans,
    RemoveLangAttributes,
    UnwrapLinks,
    RemoveHtmlTags,
    RemoveAttributeGroups,
    FlattenInlineCode,
    FlattenEmphasis,
    RemoveFootnoteRefs,
    RemoveListNumbers,
    UnescapePunctuation,
    UnwrapBracketText,
    RemoveBackslashRuns,
    RemoveGutenbergMarkers,
    RemoveAllBackslashes,
    StripTrailingBackslashes,
    CollapseSpaces,
    CollapseBlankLines,
    StripLeadingBoilerplate,
    Trim,
}

impl Pass {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Pass::NormalizeLineEndings => "normalize-line-endings",
            Pass::CollapseMultilineLinks => "collapse-multiline-links",
            Pass::ReflowParagraphs => "reflow-paragraphs",
            Pass::RemoveIdMarkers => "remove-id-markers",
            Pass::RemoveHtmlBlocks => "remove-html-blocks",
            Pass::RemoveFencedDivs => "remove-fenced-divs",
            Pass::StripHeadingAttributes => "strip-heading-attributes",
            Pass::RemoveEmptyImages => "remove-empty-images",
            Pass::RemoveAttributeSpans => "remove-attribute-spans",
            Pass::RemoveLangAttributes => "remove-lang-attributes",
            Pass::UnwrapLinks => "unwrap-links",
            Pass::RemoveHtmlTags => "remove-html-tags",
            Pass::RemoveAttributeGroups => "remove-attribute-groups",
            Pass::FlattenInlineCode => "flatten-inline-code",
            Pass::FlattenEmphasis => "flatten-emphasis",
            Pass::RemoveFootnoteRefs => "remove-footnote-refs",
            Pass::RemoveListNumbers => "remove-list-numbers",
            Pass::UnescapePunctuation => "unescape-punctuation",
            Pass::UnwrapBracketText => "unwrap-bracket-text",
            Pass::RemoveBackslashRuns => "remove-backslash-runs",
            Pass::RemoveGutenbergMarkers => "remove-gutenberg-markers",
            Pass::RemoveAllBackslashes => "remove-all-backslashes",
            Pass::StripTrailingBackslashes => "strip-trailing-backslashes",
            Pass::CollapseSpaces => "collapse-spaces",
            Pass::CollapseBlankLines => "collapse-blank-lines",
            Pass::StripLeadingBoilerplate => "strip-leading-boilerplate",
            Pass::Trim => "trim",
        }
    }

    /// Run this pass over the whole text.
    pub fn apply(&self, content: &str) -> String {
        match self {
            Pass::NormalizeLineEndings => content.replace("\r\n", "\n"),
            Pass::CollapseMultilineLinks => collapse_multiline_links(content),
            Pass::ReflowParagraphs => reflow_paragraphs(content),
            Pass::RemoveIdMarkers => strip::remove_id_markers(content),
            Pass::RemoveHtmlBlocks => strip::remove_html_blocks(content),
            Pass::RemoveFencedDivs => strip::remove_fenced_divs(content),
            Pass::StripHeadingAttributes => strip::strip_heading_attributes(content),
            Pass::RemoveEmptyImages => strip::remove_empty_images(content),
            Pass::RemoveAttributeSpans => strip::remove_attribute_spans(content),
            Pass::RemoveLangAttributes => strip::remove_lang_attributes(content),
            Pass::UnwrapLinks => strip::unwrap_links(content),
            Pass::RemoveHtmlTags => strip::remove_html_tags(content),
            Pass::RemoveAttributeGroups => strip::remove_attribute_groups(content),
            Pass::FlattenInlineCode => strip::flatten_inline_code(content),
            Pass::FlattenEmphasis => strip::flatten_emphasis(content),
            Pass::RemoveFootnoteRefs => strip::remove_footnote_refs(content),
            Pass::RemoveListNumbers => strip::remove_list_numbers(content),
            Pass::UnescapePunctuation => strip::unescape_punctuation(content),
            Pass::UnwrapBracketText => strip::unwrap_bracket_text(content),
            Pass::RemoveBackslashRuns => strip::remove_backslash_runs(content),
            Pass::RemoveGutenbergMarkers => strip::remove_gutenberg_markers(content),
            Pass::RemoveAllBackslashes => strip::remove_all_backslashes(content),
            Pass::StripTrailingBackslashes => strip::strip_trailing_backslashes(content),
            Pass::CollapseSpaces => strip::collapse_spaces(content),
            Pass::CollapseBlankLines => strip::collapse_blank_lines(content),
            Pass::StripLeadingBoilerplate => strip::strip_leading_boilerplate(content),
            Pass::Trim => content.trim().to_string(),
        }
    }
}

/// An ordered list of passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    passes: Vec<Pass>,
}

impl Pipeline {
    pub fn new(passes: Vec<Pass>) -> Self {
        Self { passes }
    }

    /// Publish-ready Markdown: line endings, link text, paragraph spacing.
    pub fn publish() -> Self {
        Self::new(vec![
            Pass::NormalizeLineEndings,
            Pass::CollapseMultilineLinks,
            Pass::ReflowParagraphs,
        ])
    }

    /// Spoken-word prose. Optional passes sit at fixed slots in the order.
    pub fn speech(options: &StripOptions) -> Self {
        let mut passes = vec![
            Pass::RemoveIdMarkers,
            Pass::RemoveHtmlBlocks,
            Pass::RemoveFencedDivs,
            Pass::StripHeadingAttributes,
            Pass::RemoveEmptyImages,
            Pass::RemoveAttributeSpans,
            Pass::RemoveLangAttributes,
            Pass::UnwrapLinks,
            Pass::RemoveHtmlTags,
            Pass::RemoveAttributeGroups,
        ];
        if options.flatten_inline_code {
            passes.push(Pass::FlattenInlineCode);
        }
        passes.extend([
            Pass::FlattenEmphasis,
            Pass::RemoveFootnoteRefs,
            Pass::RemoveListNumbers,
            Pass::UnescapePunctuation,
        ]);
        if options.unwrap_bracket_text {
            passes.push(Pass::UnwrapBracketText);
        }
        passes.extend([Pass::RemoveBackslashRuns, Pass::RemoveGutenbergMarkers]);
        if options.remove_all_backslashes {
            passes.push(Pass::RemoveAllBackslashes);
        }
        passes.extend([
            Pass::StripTrailingBackslashes,
            Pass::CollapseSpaces,
            Pass::CollapseBlankLines,
        ]);
        if options.strip_leading_boilerplate {
            passes.push(Pass::StripLeadingBoilerplate);
        }
        passes.push(Pass::Trim);
        Self::new(passes)
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Apply every pass in order, each to the previous pass's output.
    pub fn run(&self, content: &str) -> String {
        self.passes.iter().fold(content.to_string(), |text, pass| {
            let out = pass.apply(&text);
            log::debug!("{}: {} -> {} bytes", pass.name(), text.len(), out.len());
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_order() {
        assert_eq!(
            Pipeline::publish().passes(),
            &[
                Pass::NormalizeLineEndings,
                Pass::CollapseMultilineLinks,
                Pass::ReflowParagraphs
            ]
        );
    }

    #[test]
    fn test_default_speech_has_twenty_steps() {
        let pipeline = Pipeline::speech(&StripOptions::default());
        assert_eq!(pipeline.passes().len(), 20);
        assert_eq!(pipeline.passes().first(), Some(&Pass::RemoveIdMarkers));
        assert_eq!(pipeline.passes().last(), Some(&Pass::Trim));
        assert!(!pipeline.passes().contains(&Pass::FlattenInlineCode));
    }

    #[test]
    fn test_optional_passes_slot_in_order() {
        let pipeline = Pipeline::speech(&StripOptions::aggressive());
        let passes = pipeline.passes();
        let position = |pass: Pass| passes.iter().position(|p| *p == pass).unwrap();

        assert_eq!(passes.len(), 24);
        assert!(position(Pass::FlattenInlineCode) < position(Pass::FlattenEmphasis));
        assert_eq!(
            position(Pass::UnwrapBracketText),
            position(Pass::UnescapePunctuation) + 1
        );
        assert_eq!(
            position(Pass::RemoveAllBackslashes),
            position(Pass::RemoveGutenbergMarkers) + 1
        );
        assert_eq!(position(Pass::StripLeadingBoilerplate), passes.len() - 2);
    }

    #[test]
    fn test_custom_pipeline() {
        let pipeline = Pipeline::new(vec![Pass::UnwrapLinks, Pass::CollapseSpaces, Pass::Trim]);
        assert_eq!(pipeline.run("  [a](b)   c  "), "a c");
    }

    #[test]
    fn test_pass_names_unique() {
        let pipeline = Pipeline::speech(&StripOptions::aggressive());
        let mut names: Vec<&str> = pipeline.passes().iter().map(Pass::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), pipeline.passes().len());
    }
}
