//! Size-bounded chunking of chapter content.
//!
//! Paragraphs are packed first. Any packed chunk still over the limit is
//! re-packed sentence by sentence. Lengths are counted in characters.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = " ";

/// Split `content` into chunks of at most `max_size` characters.
///
/// A `max_size` of 0 disables splitting. Content that already fits comes back
/// as a single untouched chunk. A chunk is only closed once it holds at least
/// `min_size` characters, and a single paragraph or sentence longer than
/// `max_size` is kept whole.
pub fn chunk_content(content: &str, max_size: usize, min_size: usize) -> Vec<String> {
    if max_size == 0 || char_len(content) <= max_size {
        return vec![content.to_string()];
    }

    let paragraphs = PARAGRAPH_BREAK.split(content);
    let mut chunks = Vec::new();
    for chunk in pack(paragraphs, PARAGRAPH_SEPARATOR, max_size, min_size) {
        if char_len(&chunk) > max_size {
            let sentences = split_sentences(&chunk);
            chunks.extend(pack(sentences.into_iter(), SENTENCE_SEPARATOR, max_size, min_size));
        } else {
            chunks.push(chunk);
        }
    }

    log::debug!(
        "Chunked {} chars into {} chunk(s) (max {}, min {})",
        char_len(content),
        chunks.len(),
        max_size,
        min_size
    );
    chunks
}

/// Sentences of `text`, each ending with its `.`, `!` or `?`. The whitespace
/// after a sentence end is not part of either sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Greedily accumulate `units` joined by `separator`.
fn pack<'a>(
    units: impl Iterator<Item = &'a str>,
    separator: &str,
    max_size: usize,
    min_size: usize,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for unit in units {
        let unit_len = char_len(unit);
        if current_len == 0 {
            current.push_str(unit);
            current_len = unit_len;
            continue;
        }

        let overflows = current_len + unit_len + separator.len() > max_size;
        if overflows && current_len >= min_size {
            push_trimmed(&mut chunks, &current);
            current = unit.to_string();
            current_len = unit_len;
        } else {
            current.push_str(separator);
            current.push_str(unit);
            current_len += separator.len() + unit_len;
        }
    }

    push_trimmed(&mut chunks, &current);
    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_max_disables_splitting() {
        let content = "a".repeat(5000);
        assert_eq!(chunk_content(&content, 0, 500), vec![content]);
    }

    #[test]
    fn test_content_that_fits_is_untouched() {
        let content = "  Short text.\n\nSecond paragraph.  ";
        assert_eq!(chunk_content(content, 3000, 500), vec![content.to_string()]);
    }

    #[test]
    fn test_paragraph_packing() {
        let content = "aaaa\n\nbbbb\n\ncccc\n\ndddd";
        let chunks = chunk_content(content, 10, 0);
        assert_eq!(chunks, vec!["aaaa\n\nbbbb", "cccc\n\ndddd"]);
    }

    #[test]
    fn test_three_newlines_split_paragraphs() {
        let chunks = chunk_content("aaaa\n\n\nbbbb", 5, 0);
        assert_eq!(chunks, vec!["aaaa", "bbbb"]);
    }

    #[test]
    fn test_min_size_keeps_chunk_open() {
        let content = "aa\n\nbbbbbbbb\n\ncc";
        let chunks = chunk_content(content, 10, 5);
        assert_eq!(chunks[0], "aa\n\nbbbbbbbb");
    }

    #[test]
    fn test_sentence_fallback() {
        let content = "One sentence here. Two sentence here! Three sentence here? Four.";
        let chunks = chunk_content(content, 40, 0);
        assert_eq!(
            chunks,
            vec![
                "One sentence here. Two sentence here!",
                "Three sentence here? Four."
            ]
        );
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let long = "x".repeat(50);
        let content = format!("{}. Short one.", long);
        let chunks = chunk_content(&content, 20, 0);
        assert_eq!(chunks[0], format!("{}.", long));
        assert_eq!(chunks[1], "Short one.");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let content = "ééééé";
        assert_eq!(chunk_content(content, 5, 0), vec![content.to_string()]);
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Hi there. How are you?  Fine!\nBye"),
            vec!["Hi there.", "How are you?", "Fine!", "Bye"]
        );
        assert_eq!(split_sentences("No terminator"), vec!["No terminator"]);
        assert!(split_sentences("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_chunks_bounded_or_irreducible(
            sentences in prop::collection::vec("[a-z]{1,12}( [a-z]{1,12}){0,6}[.!?]", 1..30),
            breaks in prop::collection::vec(prop::bool::ANY, 30),
            max in 10usize..120,
        ) {
            let mut content = String::new();
            for (i, sentence) in sentences.iter().enumerate() {
                if i > 0 {
                    content.push_str(if breaks[i] { "\n\n" } else { " " });
                }
                content.push_str(sentence);
            }

            let chunks = chunk_content(&content, max, 0);
            for chunk in &chunks {
                prop_assert!(
                    chunk.chars().count() <= max || split_sentences(chunk).len() == 1,
                    "oversized chunk: {:?}",
                    chunk
                );
            }
        }

        #[test]
        fn prop_no_words_lost(
            content in "[a-z.!? \n]{0,400}",
            max in 1usize..100,
            min in 0usize..50,
        ) {
            let chunks = chunk_content(&content, max, min);
            let original: Vec<&str> = content.split_whitespace().collect();
            let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.split_whitespace()).collect();
            prop_assert_eq!(original, rebuilt);
        }
    }
}
