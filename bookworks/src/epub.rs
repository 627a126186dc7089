// In-process EPUB to Markdown reading

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::document::Document;
use crate::error::{BookworksError, Result};

static SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h[12][^>]*>(.*?)</h[12]>").unwrap());
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static TOP_LEVEL_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^# ").unwrap());
static EXTRA_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Wrap width handed to html2text, wide enough that prose is never wrapped
const TEXT_WIDTH: usize = 1000;

/// One spine document after HTML conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// First `<h1>`/`<h2>` text, if any
    pub title: Option<String>,
    /// Markdown-ish text with headings at level 2 or deeper
    pub text: String,
}

/// Read an EPUB into a Markdown [`Document`]: `# Book title`, then one
/// `## Section` per non-empty spine document in reading order.
pub fn read_epub(path: &Path) -> Result<Document> {
    let mut doc = epub::doc::EpubDoc::new(path)
        .map_err(|e| BookworksError::Epub(format!("Failed to open {}: {}", path.display(), e)))?;

    let title = doc.mdata("title").map(|m| m.value.clone());
    let author = doc.mdata("creator").map(|m| m.value.clone());
    let date = doc.mdata("date").map(|m| m.value.clone());

    let mut sections = Vec::new();
    let spine = doc.spine.clone();
    for item in spine.iter() {
        let Some((bytes, _mime)) = doc.get_resource(&item.idref) else {
            log::warn!("Spine item {} has no resource", item.idref);
            continue;
        };
        let html = String::from_utf8_lossy(&bytes);
        if let Some(section) = html_to_section(&html) {
            sections.push(section);
        }
    }

    log::info!("Read {} section(s) from {}", sections.len(), path.display());

    let title_text = title.as_deref().unwrap_or(crate::document::UNTITLED_DOCUMENT);
    let mut document = Document::new(render_markdown(title_text, &sections));
    if let Some(title) = title {
        document = document.with_title(title);
    }
    if let Some(author) = author {
        document = document.with_author(author);
    }
    if let Some(date) = date {
        document = document.with_date(date);
    }
    Ok(document)
}

/// Convert one spine document, or `None` when it holds no text.
pub fn html_to_section(html: &str) -> Option<Section> {
    let title = section_title(html);
    let text = tidy_text(&html2text::from_read(html.as_bytes(), TEXT_WIDTH));
    if text.is_empty() {
        return None;
    }
    let text = TOP_LEVEL_HEADING.replace_all(&text, "## ").into_owned();
    Some(Section { title, text })
}

/// Assemble sections under a level-1 book title.
pub fn render_markdown(book_title: &str, sections: &[Section]) -> String {
    let mut out = format!("# {}\n", book_title);
    for section in sections {
        out.push('\n');
        if !section.text.starts_with('#') {
            if let Some(title) = &section.title {
                out.push_str(&format!("## {}\n\n", title));
            }
        }
        out.push_str(&section.text);
        out.push('\n');
    }
    out
}

fn section_title(html: &str) -> Option<String> {
    let inner = SECTION_HEADING.captures(html)?.get(1)?.as_str();
    let title = HTML_TAG.replace_all(inner, "");
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

fn tidy_text(text: &str) -> String {
    let trimmed: Vec<&str> = text.lines().map(str::trim_end).collect();
    EXTRA_BLANK_LINES
        .replace_all(&trimmed.join("\n"), "\n\n")
        .trim()
        .to_string()
}
