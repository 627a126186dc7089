use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the `publish` command reads
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Extensions the `tts` and `clean` commands read
pub const BOOK_EXTENSIONS: &[&str] = &["md", "markdown", "txt", "epub"];

/// Expand directory arguments into the matching files they contain.
///
/// File arguments are kept as given, missing ones included, so the loader can
/// report them. Files found in a directory are sorted.
pub fn collect_inputs(
    inputs: &[PathBuf],
    recursive: bool,
    extensions: &[&str],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = find_files(input, recursive, extensions)?;
            found.sort();
            log::debug!("{}: {} input file(s)", input.display(), found.len());
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Find all files with one of `extensions` in the given directory
fn find_files(dir: &Path, recursive: bool, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if recursive {
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                files.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?
        {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, extensions) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Check if a path has one of `extensions` (case-insensitive)
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Book title from a file name: `my_book.md` -> `my_book`
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(bookworks::UNTITLED_DOCUMENT)
        .to_string()
}
