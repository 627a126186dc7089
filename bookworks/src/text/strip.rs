//! Markup stripping for spoken-word output.
//!
//! Every function here is one global rewrite over the whole text. They are
//! composed in a fixed order by [`Pipeline::speech`]; later passes assume the
//! earlier ones already collapsed overlapping syntax.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Pipeline;

/// Which optional passes a speech pipeline runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripOptions {
    /// Turn `` `code` `` spans into bare text
    pub flatten_inline_code: bool,
    /// Turn any leftover `[text]` or `[text]{attrs}` into bare text
    pub unwrap_bracket_text: bool,
    /// Drop every backslash left after un-escaping
    pub remove_all_backslashes: bool,
    /// Drop everything before the first paragraph that starts with a word
    pub strip_leading_boilerplate: bool,
}

impl StripOptions {
    /// The aggressive variant used for Project Gutenberg conversions.
    pub fn aggressive() -> Self {
        Self {
            flatten_inline_code: true,
            unwrap_bracket_text: true,
            remove_all_backslashes: true,
            strip_leading_boilerplate: true,
        }
    }
}

/// Strip `content` with the default speech pipeline.
pub fn strip_for_speech(content: &str) -> String {
    Pipeline::speech(&StripOptions::default()).run(content)
}

static EMPTY_ID_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\]\{#[^}]+\}").unwrap());
static HTML_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\{=html\}[\s\S]*?```").unwrap());
static DIV_ATTRIBUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"::: \{[^}]+\}").unwrap());
static DIV_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^:::.*$").unwrap());
static HEADING_ATTRIBUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(#+ .*?) \{[^}]+\}").unwrap());
static EMPTY_IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[\]\([^)]+\)").unwrap());
static COVER_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\.x-ebookmaker-cover\}").unwrap());
static ID_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{#[^}]+\}").unwrap());
static ATTRIBUTE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]\{[^}]+\}").unwrap());
static LANG_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"lang="[^"]+""#).unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static ATTRIBUTE_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]+\}").unwrap());
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRONG_STARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static EMPHASIS_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static STRONG_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"__([^_]+)__").unwrap());
static EMPHASIS_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+)_").unwrap());
static FOOTNOTE_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\^[^\]]+\]").unwrap());
static LIST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+\.\s+").unwrap());
static ESCAPED_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\([\\`*_{}\[\]()#+\-.!])").unwrap());
static BRACKET_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\](\{[^}]+\})?").unwrap());
static BACKSLASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\{2,}").unwrap());
static GUTENBERG_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)START OF THE PROJECT GUTENBERG EBOOK.*").unwrap());
static GUTENBERG_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)END OF THE PROJECT GUTENBERG EBOOK.*").unwrap());
static TRAILING_BACKSLASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)\\$").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());
static BLANK_LINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static PARAGRAPH_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n\w").unwrap());

fn remove(re: &Regex, content: &str) -> String {
    re.replace_all(content, "").into_owned()
}

fn keep_first_group(re: &Regex, content: &str) -> String {
    re.replace_all(content, "${1}").into_owned()
}

/// `[]{#id}` anchors left by EPUB conversion.
pub fn remove_id_markers(content: &str) -> String {
    remove(&EMPTY_ID_MARKER, content)
}

/// Raw HTML fences tagged `{=html}`, through the next closing fence.
pub fn remove_html_blocks(content: &str) -> String {
    remove(&HTML_BLOCK, content)
}

/// `::: {...}` block attributes and any line opening with `:::`.
pub fn remove_fenced_divs(content: &str) -> String {
    let content = remove(&DIV_ATTRIBUTES, content);
    remove(&DIV_LINE, &content)
}

/// Trailing `{...}` attribute groups on heading lines.
pub fn strip_heading_attributes(content: &str) -> String {
    keep_first_group(&HEADING_ATTRIBUTES, content)
}

/// `![](url)` images and the ebookmaker cover marker.
pub fn remove_empty_images(content: &str) -> String {
    let content = remove(&EMPTY_IMAGE, content);
    remove(&COVER_MARKER, &content)
}

/// Leftover `{#id}` markers and `[...]{...}` attribute spans.
pub fn remove_attribute_spans(content: &str) -> String {
    let content = remove(&ID_MARKER, content);
    remove(&ATTRIBUTE_SPAN, &content)
}

pub fn remove_lang_attributes(content: &str) -> String {
    remove(&LANG_ATTRIBUTE, content)
}

/// `[text](url)` becomes `text`.
pub fn unwrap_links(content: &str) -> String {
    keep_first_group(&LINK, content)
}

pub fn remove_html_tags(content: &str) -> String {
    remove(&HTML_TAG, content)
}

pub fn remove_attribute_groups(content: &str) -> String {
    remove(&ATTRIBUTE_GROUP, content)
}

pub fn flatten_inline_code(content: &str) -> String {
    keep_first_group(&INLINE_CODE, content)
}

/// `**bold**`, `*italic*`, `__bold__` and `_italic_` become their inner text.
/// Nested emphasis is not handled.
pub fn flatten_emphasis(content: &str) -> String {
    [
        &*STRONG_STARS,
        &*EMPHASIS_STAR,
        &*STRONG_UNDERSCORES,
        &*EMPHASIS_UNDERSCORE,
    ]
    .into_iter()
    .fold(content.to_string(), |text, re| keep_first_group(re, &text))
}

/// `[^id]` footnote references.
pub fn remove_footnote_refs(content: &str) -> String {
    remove(&FOOTNOTE_REF, content)
}

/// `1. ` style prefixes at line starts.
pub fn remove_list_numbers(content: &str) -> String {
    remove(&LIST_NUMBER, content)
}

/// `\*` and friends become the bare character.
pub fn unescape_punctuation(content: &str) -> String {
    keep_first_group(&ESCAPED_PUNCTUATION, content)
}

pub fn unwrap_bracket_text(content: &str) -> String {
    keep_first_group(&BRACKET_TEXT, content)
}

pub fn remove_backslash_runs(content: &str) -> String {
    remove(&BACKSLASH_RUN, content)
}

/// Project Gutenberg START/END banners, to the end of their line.
pub fn remove_gutenberg_markers(content: &str) -> String {
    let content = remove(&GUTENBERG_START, content);
    remove(&GUTENBERG_END, &content)
}

pub fn remove_all_backslashes(content: &str) -> String {
    content.replace('\\', "")
}

/// Hard line breaks (`\` at end of line) left by pandoc.
pub fn strip_trailing_backslashes(content: &str) -> String {
    remove(&TRAILING_BACKSLASH, content)
}

pub fn collapse_spaces(content: &str) -> String {
    SPACE_RUN.replace_all(content, " ").into_owned()
}

/// Three or more newlines become exactly two.
pub fn collapse_blank_lines(content: &str) -> String {
    BLANK_LINE_RUN.replace_all(content, "\n\n").into_owned()
}

/// Drop everything before the first blank line that is followed by a word
/// character. Text without such a boundary is returned unchanged.
pub fn strip_leading_boilerplate(content: &str) -> String {
    match PARAGRAPH_START.find(content) {
        Some(m) => content[m.start()..].to_string(),
        None => content.to_string(),
    }
}
