//! Paragraph reflow: blank-line separation between prose lines.

/// Line prefixes that mark headings and list items.
const SPECIAL_PREFIXES: &[char] = &['#', '*', '-', '+'];

/// Insert a blank line after every prose line that is directly followed by
/// another non-blank line.
///
/// Expects `\n` line endings. Headings and list items are emitted unchanged,
/// as is any line already followed by a blank line or the end of input.
/// Trailing whitespace is removed from every line.
pub fn reflow_paragraphs(content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let mut result = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            result.push(String::new());
            continue;
        }

        let is_special = line.trim_start().starts_with(SPECIAL_PREFIXES);
        let next_is_empty = lines.get(i + 1).is_none_or(|next| next.trim().is_empty());

        if is_special || next_is_empty {
            result.push(line.to_string());
        } else {
            result.push(format!("{}\n", line));
        }
    }

    result.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_lines_separated() {
        let content = "This is a paragraph.\nAnother line.";
        assert_eq!(reflow_paragraphs(content), "This is a paragraph.\n\nAnother line.");
    }

    #[test]
    fn test_headings_and_lists_untouched() {
        let content = "# Title\n* one\n* two\n- three\n+ four";
        assert_eq!(reflow_paragraphs(content), content);
    }

    #[test]
    fn test_line_before_blank_untouched() {
        let content = "Line 1\n\nLine 2";
        assert_eq!(reflow_paragraphs(content), content);
    }

    #[test]
    fn test_trailing_whitespace_removed() {
        let content = "Line 1   \n   \nLine 2\t";
        assert_eq!(reflow_paragraphs(content), "Line 1\n\nLine 2");
    }

    #[test]
    fn test_prose_before_heading() {
        let content = "Intro line\n## Section";
        assert_eq!(reflow_paragraphs(content), "Intro line\n\n## Section");
    }

    #[test]
    fn test_indented_list_item() {
        let content = "  - nested\nnext";
        assert_eq!(reflow_paragraphs(content), content);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(reflow_paragraphs(""), "");
    }
}
