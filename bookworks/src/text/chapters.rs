//! Chapter segmentation along heading lines.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::document::Chapter;
use crate::error::BookworksError;

/// Level-1 and level-2 heading lines. Only spaces and tabs may separate the
/// markers from the title, so a bare `#` line never swallows the next line.
static CHAPTER_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,2}[ \t]+(.*)$").unwrap());

/// How heading lines are detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SplitStrategy {
    /// Only `#` and `##` headings start chapters. A leading `# Title` with
    /// nothing below it is dropped.
    #[default]
    PatternScan,
    /// Any `#` line starts a chapter. A `# ` heading seen before any other
    /// heading is the book title: the line is consumed and the text under it
    /// becomes a chapter titled with the book title.
    LineWalk,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitStrategy::PatternScan => "pattern-scan",
            SplitStrategy::LineWalk => "line-walk",
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitStrategy {
    type Err = BookworksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pattern-scan" | "pattern_scan" | "pattern" => Ok(Self::PatternScan),
            "line-walk" | "line_walk" | "line" => Ok(Self::LineWalk),
            _ => Err(BookworksError::Config(format!("Unknown split strategy: {}", s))),
        }
    }
}

/// Split `content` into chapters.
///
/// Text before the first chapter heading is dropped, as are chapters whose
/// trimmed content is empty. A leading lone `# ` heading is the book title
/// and never becomes a chapter; later heading-only chapters such as
/// `## Part One` are kept. When no chapter survives, the whole trimmed
/// document becomes one chapter titled `book_title`, so the result is never
/// empty.
pub fn split_chapters(content: &str, book_title: &str, strategy: SplitStrategy) -> Vec<Chapter> {
    let mut chapters = match strategy {
        SplitStrategy::PatternScan => pattern_scan(content, book_title),
        SplitStrategy::LineWalk => line_walk(content, book_title),
    };

    if chapters.is_empty() {
        if !content.trim().is_empty() {
            log::warn!("No chapters found, using the whole document as \"{}\"", book_title);
        }
        chapters.push(Chapter::new(book_title, content.trim()));
    }

    log::debug!("{} split into {} chapter(s)", strategy, chapters.len());
    chapters
}

fn pattern_scan(content: &str, book_title: &str) -> Vec<Chapter> {
    let headings: Vec<(usize, &str)> = CHAPTER_HEADING
        .captures_iter(content)
        .filter_map(|caps| Some((caps.get(0)?.start(), caps.get(1)?.as_str())))
        .collect();

    let mut chapters = Vec::new();
    for (i, (start, title)) in headings.iter().enumerate() {
        let end = headings.get(i + 1).map_or(content.len(), |(next, _)| *next);
        push_chapter(&mut chapters, title, &content[*start..end], book_title);
    }

    if chapters.first().is_some_and(|c| is_title_heading(&c.content)) {
        log::debug!("Skipping title heading \"{}\"", chapters[0].title);
        chapters.remove(0);
    }
    chapters
}

fn line_walk(content: &str, book_title: &str) -> Vec<Chapter> {
    let mut chapters = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;
    let mut seen_heading = false;

    for line in content.split('\n') {
        if line.starts_with('#') {
            // The title heading line goes, the text under it stays.
            let consumed_as_title = !seen_heading && line.starts_with("# ");
            seen_heading = true;
            if consumed_as_title {
                current = Some((book_title, Vec::new()));
                continue;
            }
            if let Some((title, lines)) = current.take() {
                push_chapter(&mut chapters, title, &lines.join("\n"), book_title);
            }
            current = Some((line.trim_start_matches('#'), vec![line]));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((title, lines)) = current {
        push_chapter(&mut chapters, title, &lines.join("\n"), book_title);
    }
    chapters
}

fn push_chapter(chapters: &mut Vec<Chapter>, title: &str, span: &str, book_title: &str) {
    let content = span.trim();
    if content.is_empty() {
        return;
    }

    let title = match title.trim() {
        "" => book_title,
        t => t,
    };
    chapters.push(Chapter::new(title, content));
}

/// A single `# ` heading line with nothing under it.
fn is_title_heading(content: &str) -> bool {
    content.starts_with("# ") && !content.contains('\n')
}
