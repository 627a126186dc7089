use bookworks::{
    MockConverter, PublishOptions, SpeechOptions, SplitStrategy, TtsWriter, clean_markdown,
    prepare, publish, split_chapters, strip_for_speech,
};
use tempfile::TempDir;

const SAMPLE: &str = "# Sample Book\r\n\
\r\n\
## Chapter 1: Introduction\r\n\
This is the first paragraph.\r\n\
It continues on a second line.\r\n\
\r\n\
- List item 1\r\n\
- List item 2\r\n\
\r\n\
## Chapter 2: More Content\r\n\
A [link that\r\n\
wraps](https://example.com) sits here.\r\n";

#[test]
fn test_clean_then_split_round_trip() {
    let (cleaned, metadata) = clean_markdown(SAMPLE);
    assert_eq!(metadata.title, "Sample Book");

    let chapters = split_chapters(&cleaned, &metadata.title, SplitStrategy::default());
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].title, "Chapter 1: Introduction");
    assert_eq!(chapters[1].title, "Chapter 2: More Content");

    let joined: String = chapters
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    for body in [
        "This is the first paragraph.",
        "It continues on a second line.",
        "- List item 1",
        "[link that wraps](https://example.com)",
    ] {
        assert_eq!(joined.matches(body).count(), 1, "{body:?}");
    }
}

#[test]
fn test_strip_example_sentence() {
    let input = "**Bold** and *italic* text with [link](http://example.com) and []{#id}";
    assert_eq!(strip_for_speech(input), "Bold and italic text with link and");
}

#[test]
fn test_speech_files_follow_naming() {
    let dir = TempDir::new().unwrap();
    let long_paragraphs: Vec<String> = (0..4)
        .map(|i| format!("Paragraph {} {}", i, "words ".repeat(20).trim_end()))
        .collect();
    let content = format!(
        "# Book\n\n## Short\n\nTiny.\n\n## Long\n\n{}",
        long_paragraphs.join("\n\n")
    );

    let options = SpeechOptions {
        split_chapters: true,
        max_chunk_size: 300,
        min_chunk_size: 0,
        ..SpeechOptions::new("Test Book")
    };
    let book = prepare(&content, &options);
    let files = TtsWriter::new(dir.path()).write(&book).unwrap();

    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names[0], "Test Book_ch1_tts.md");
    assert!(names.len() > 2);
    for (i, name) in names[1..].iter().enumerate() {
        assert_eq!(name, &format!("Test Book_ch2_part{}_tts.md", i + 1));
    }

    let first_part = std::fs::read_to_string(&files[1]).unwrap();
    assert!(first_part.starts_with("# Long (Part 1)\n\n## Long"));
    assert!(dir.path().join("Test Book_manifest.json").exists());
}

#[test]
fn test_publish_with_mock_converter() {
    let dir = TempDir::new().unwrap();
    let converter = MockConverter::succeeds();
    let options = PublishOptions {
        output_dir: dir.path().to_path_buf(),
        ..PublishOptions::default()
    };

    let output = publish(SAMPLE, &options, &converter).unwrap();
    assert_eq!(output, dir.path().join("Sample Book.epub"));

    let calls = converter.calls();
    let args = calls[0].options.args();
    assert_eq!(args[0], "--metadata=title:Sample Book");
    assert!(args.contains(&"--epub-chapter-level=2".to_string()));
}
