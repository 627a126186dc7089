//! Filesystem-safe names from arbitrary titles.

/// Fallback when nothing usable survives sanitization.
pub const UNTITLED: &str = "untitled";

/// Characters replaced with a hyphen.
const UNSAFE_CHARS: &[char] = &['\r', '\n', '\t', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Map a title to a string usable as a filename component.
///
/// Unsafe characters become `-`, runs of `-` collapse to one, and leading or
/// trailing hyphens and spaces are removed. Never returns an empty string.
pub fn sanitize_filename(title: &str) -> String {
    let mut result = String::with_capacity(title.len());

    for c in title.chars() {
        let c = if UNSAFE_CHARS.contains(&c) { '-' } else { c };
        if c == '-' && result.ends_with('-') {
            continue;
        }
        result.push(c);
    }

    let trimmed = result.trim_matches(|c| c == '-' || c == ' ');
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}
