//! Collapse Markdown link text that spans several lines.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `[text](url)` where `text` may contain newlines. The URL stops at the
/// first `)`, so URLs containing parentheses are not supported.
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([\s\S]*?)\]\((.*?)\)").unwrap());

/// Rewrite every link so its text sits on a single line.
///
/// Whitespace runs inside the link text, embedded newlines included, become
/// single spaces and the text is trimmed. Must run before paragraph reflow.
pub fn collapse_multiline_links(content: &str) -> String {
    LINK.replace_all(content, |caps: &Captures| {
        let text = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
        format!("[{}]({})", text, &caps[2])
    })
    .into_owned()
}
