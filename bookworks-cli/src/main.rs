//! bookworks - Clean Markdown or EPUB books for EPUB publishing and TTS reading

mod inputs;

use anyhow::{Context, Result};
use bookworks::{
    Config, Converter, Document, EpubReader, PandocConverter, PublishOptions, SpeechOptions,
    SplitStrategy, StripOptions, TtsWriter, clean_markdown, load_document, prepare, publish_file,
};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use inputs::{BOOK_EXTENSIONS, MARKDOWN_EXTENSIONS, collect_inputs, title_from_path};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "bookworks",
    about = "Clean Markdown or EPUB books for EPUB publishing and TTS reading",
    long_about = "Normalizes Markdown for pandoc EPUB builds, and strips markup, splits chapters and chunks text for text-to-speech"
)]
#[command(version)]
struct Args {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build an EPUB from Markdown with pandoc
    Publish {
        /// Markdown files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Author metadata (overrides config)
        #[arg(short, long)]
        author: Option<String>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip the table of contents
        #[arg(long)]
        no_toc: bool,

        /// Keep the processed Markdown next to the EPUB
        #[arg(long)]
        keep_intermediate: bool,

        /// Search directories recursively
        #[arg(short, long)]
        recursive: bool,
    },
    /// Write TTS-ready Markdown
    Tts {
        /// Markdown or EPUB files, or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Book title (default: EPUB metadata, then file name)
        #[arg(long)]
        book_title: Option<String>,

        /// Write one file per chapter
        #[arg(long)]
        split_chapters: bool,

        /// Maximum characters per chapter file before chunking (0 disables)
        #[arg(long)]
        max_chars: Option<usize>,

        /// Minimum characters before a chunk may be closed
        #[arg(long)]
        min_chars: Option<usize>,

        /// Chapter detection: pattern-scan or line-walk
        #[arg(long)]
        strategy: Option<SplitStrategy>,

        /// Flatten `inline code` spans into plain words
        #[arg(long)]
        flatten_code: bool,

        /// Drop front matter before the first prose paragraph
        #[arg(long)]
        strip_preamble: bool,

        /// Unwrap leftover brackets and drop stray backslashes (for Project
        /// Gutenberg conversions); implies --flatten-code and --strip-preamble
        #[arg(long)]
        aggressive: bool,

        /// Skip paragraph reflow before stripping
        #[arg(long)]
        no_reflow: bool,

        /// Read EPUB files in-process instead of through pandoc
        #[arg(long)]
        native_epub: bool,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Search directories recursively
        #[arg(short, long)]
        recursive: bool,
    },
    /// Print a cleaned document
    Clean {
        /// Markdown or EPUB file
        input: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Strip markup for speech instead of cleaning for publishing
        #[arg(long)]
        speech: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the default author
    SetAuthor {
        author: String,
    },
    /// Set the default output directory
    SetOutputDir {
        path: PathBuf,
    },
    /// Set an explicit pandoc executable
    SetPandoc {
        path: PathBuf,
    },
    /// Set the default maximum characters per TTS file (0 disables chunking)
    SetMaxChars {
        value: usize,
    },
    /// Set the default chapter detection strategy
    SetStrategy {
        strategy: SplitStrategy,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.debug);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Config { action } => handle_config_command(&action),
        Commands::Publish {
            inputs,
            author,
            output_dir,
            no_toc,
            keep_intermediate,
            recursive,
        } => {
            let config = Config::load().context("Failed to load configuration")?;
            let mut options = PublishOptions::from_config(&config);
            if let Some(author) = author {
                options.author = author;
            }
            if let Some(dir) = output_dir {
                options.output_dir = dir;
            }
            if no_toc {
                options.toc = false;
            }
            if keep_intermediate {
                options.keep_intermediate = true;
            }

            let converter = PandocConverter::new(config.converter.pandoc_path.clone())?;
            let files = collect_inputs(&inputs, recursive, MARKDOWN_EXTENSIONS)?;
            run_each(&files, "Publishing", |file| {
                let output = publish_file(file, &options, &converter)?;
                Ok(format!("Created EPUB: {}", output.display()))
            })
        }
        Commands::Tts {
            inputs,
            book_title,
            split_chapters,
            max_chars,
            min_chars,
            strategy,
            flatten_code,
            strip_preamble,
            aggressive,
            no_reflow,
            native_epub,
            output_dir,
            recursive,
        } => {
            let config = Config::load().context("Failed to load configuration")?;
            let reader = if native_epub {
                EpubReader::Native
            } else {
                config.converter.epub_reader
            };
            let pandoc = optional_pandoc(&config);
            let writer = TtsWriter::new(output_dir.unwrap_or_else(|| config.output_dir()));

            let files = collect_inputs(&inputs, recursive, BOOK_EXTENSIONS)?;
            run_each(&files, "Preparing", |file| {
                let mut doc = load(file, pandoc.as_ref(), reader)?;
                if let Some(title) = &book_title {
                    doc = doc.with_title(title.clone());
                }
                let metadata = doc.metadata(&title_from_path(file));
                log::info!(
                    "{} by {} ({})",
                    metadata.title,
                    metadata.author.as_deref().unwrap_or("unknown author"),
                    metadata.date.as_deref().unwrap_or("undated")
                );

                let mut options = SpeechOptions::from_config(metadata.title, &config.speech);
                if aggressive {
                    options.strip = StripOptions::aggressive();
                }
                options.split_chapters |= split_chapters;
                options.strip.flatten_inline_code |= flatten_code;
                options.strip.strip_leading_boilerplate |= strip_preamble;
                if no_reflow {
                    options.reflow = false;
                }
                if let Some(max) = max_chars {
                    options.max_chunk_size = max;
                }
                if let Some(min) = min_chars {
                    options.min_chunk_size = min;
                }
                if let Some(strategy) = strategy {
                    options.strategy = strategy;
                }

                let book = prepare(&doc.text, &options);
                let written = writer.write(&book)?;
                Ok(match written.as_slice() {
                    [single] => format!("Created TTS-ready markdown: {}", single.display()),
                    _ => format!(
                        "Created {} TTS-ready markdown files in {}",
                        written.len(),
                        writer.output_dir().display()
                    ),
                })
            })
        }
        Commands::Clean {
            input,
            output,
            speech,
        } => {
            let config = Config::load().context("Failed to load configuration")?;
            let pandoc = optional_pandoc(&config);
            let doc = load(&input, pandoc.as_ref(), config.converter.epub_reader)?;

            let cleaned = if speech {
                let title = doc.metadata(&title_from_path(&input)).title;
                let mut options = SpeechOptions::from_config(title, &config.speech);
                options.split_chapters = false;
                prepare(&doc.text, &options).cleaned
            } else {
                let (cleaned, metadata) = clean_markdown(&doc.text);
                log::info!("Title: {}", metadata.title);
                cleaned
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, cleaned)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("Wrote {}", path.display());
                }
                None => println!("{}", cleaned),
            }
            Ok(())
        }
    }
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    match action {
        ConfigAction::Show => {
            let path = Config::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            println!("{:#?}", config);
            return Ok(());
        }
        ConfigAction::SetAuthor { author } => {
            config.author = author.clone();
            println!("Default author set to: {}", author);
        }
        ConfigAction::SetOutputDir { path } => {
            config.output_dir = Some(path.clone());
            println!("Default output directory set to: {}", path.display());
        }
        ConfigAction::SetPandoc { path } => {
            if !path.exists() {
                anyhow::bail!("pandoc not found at {}", path.display());
            }
            config.converter.pandoc_path = Some(path.clone());
            println!("pandoc path set to: {}", path.display());
        }
        ConfigAction::SetMaxChars { value } => {
            config.speech.max_chunk_size = *value;
            println!("Default max characters set to: {}", value);
        }
        ConfigAction::SetStrategy { strategy } => {
            config.speech.strategy = *strategy;
            println!("Default chapter strategy set to: {}", strategy);
        }
    }
    config.save()?;
    Ok(())
}

/// pandoc if it can be found; only `.epub` inputs read through pandoc need it.
fn optional_pandoc(config: &Config) -> Option<PandocConverter> {
    match PandocConverter::new(config.converter.pandoc_path.clone()) {
        Ok(converter) => Some(converter),
        Err(e) => {
            log::debug!("{}", e);
            None
        }
    }
}

fn load(path: &Path, pandoc: Option<&PandocConverter>, reader: EpubReader) -> Result<Document> {
    let converter = pandoc.map(|c| c as &dyn Converter);
    load_document(path, converter, reader)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Run `job` over every file with a spinner. Each file is independent: a
/// failure is reported and the rest still run.
fn run_each<F>(files: &[PathBuf], verb: &str, mut job: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<String>,
{
    if files.is_empty() {
        anyhow::bail!("No input files found");
    }

    let mut failures = 0;
    for file in files {
        let pb = spinner(format!("{} {}", verb, file.display()));
        let result = job(file);
        pb.finish_and_clear();

        match result {
            Ok(summary) => eprintln!("{}", summary),
            Err(e) => {
                failures += 1;
                eprintln!("Error processing {}: {:#}", file.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed", failures, files.len());
    }
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_tts_flags() {
        let args = Args::try_parse_from([
            "bookworks",
            "-d",
            "tts",
            "book.md",
            "--split-chapters",
            "--max-chars",
            "1200",
            "--strategy",
            "line-walk",
        ])
        .unwrap();

        assert!(args.debug);
        match args.command {
            Commands::Tts {
                inputs,
                split_chapters,
                max_chars,
                strategy,
                ..
            } => {
                assert_eq!(inputs, vec![PathBuf::from("book.md")]);
                assert!(split_chapters);
                assert_eq!(max_chars, Some(1200));
                assert_eq!(strategy, Some(SplitStrategy::LineWalk));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_aggressive_flag() {
        let args = Args::try_parse_from(["bookworks", "tts", "book.epub", "--aggressive"]).unwrap();
        match args.command {
            Commands::Tts {
                aggressive,
                flatten_code,
                ..
            } => {
                assert!(aggressive);
                assert!(!flatten_code);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_strategy_rejected() {
        let result = Args::try_parse_from(["bookworks", "tts", "book.md", "--strategy", "zigzag"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_publish_requires_input() {
        assert!(Args::try_parse_from(["bookworks", "publish"]).is_err());
    }

    #[test]
    fn test_run_each_counts_failures() {
        let files = vec![PathBuf::from("a.md"), PathBuf::from("b.md")];
        let err = run_each(&files, "Testing", |file| {
            if file.ends_with("b.md") {
                anyhow::bail!("boom");
            }
            Ok("ok".to_string())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 file(s) failed");
    }

    #[test]
    fn test_run_each_empty() {
        assert!(run_each(&[], "Testing", |_| Ok(String::new())).is_err());
    }
}
