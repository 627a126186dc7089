//! Pandoc converter
//!
//! Runs the installed `pandoc` executable as a subprocess.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::{ConvertOptions, Converter};
use crate::error::{BookworksError, Result};

const PANDOC: &str = "pandoc";

/// Converter backed by the `pandoc` CLI
#[derive(Debug, Clone)]
pub struct PandocConverter {
    pandoc_path: PathBuf,
}

impl PandocConverter {
    /// Locate pandoc, either at `pandoc_path` or in PATH.
    ///
    /// Returns an error if the executable is not found.
    pub fn new(pandoc_path: Option<PathBuf>) -> Result<Self> {
        let pandoc_path = match pandoc_path {
            Some(path) => {
                if !path.exists() {
                    return Err(BookworksError::ToolNotFound {
                        tool: format!("{} (configured path {})", PANDOC, path.display()),
                    });
                }
                path
            }
            None => which::which(PANDOC).map_err(|_| BookworksError::ToolNotFound {
                tool: PANDOC.to_string(),
            })?,
        };

        log::debug!("Using pandoc at {}", pandoc_path.display());
        Ok(Self { pandoc_path })
    }

    pub fn path(&self) -> &Path {
        &self.pandoc_path
    }

    fn run(&self, cmd: &mut Command) -> Result<Vec<u8>> {
        let output = cmd.output().map_err(|e| {
            BookworksError::ConversionFailed(format!("Error running pandoc: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BookworksError::ConversionFailed(format!(
                "Pandoc error: {}",
                stderr
            )));
        }
        Ok(output.stdout)
    }
}

impl Converter for PandocConverter {
    fn convert(&self, input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
        let mut cmd = Command::new(&self.pandoc_path);
        cmd.arg(input).arg("-o").arg(output).args(options.args());

        log::info!("Running pandoc: {} -> {}", input.display(), output.display());
        self.run(&mut cmd)?;
        Ok(())
    }

    fn to_markdown(&self, input: &Path) -> Result<String> {
        let mut cmd = Command::new(&self.pandoc_path);
        cmd.arg(input).args(["-t", "markdown"]);

        let stdout = self.run(&mut cmd)?;
        String::from_utf8(stdout)
            .map_err(|e| BookworksError::ConversionFailed(format!("Invalid UTF-8: {}", e)))
    }

    fn name(&self) -> &'static str {
        "pandoc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_path() {
        let err = PandocConverter::new(Some(PathBuf::from("/nonexistent/bin/pandoc"))).unwrap_err();
        assert!(matches!(err, BookworksError::ToolNotFound { .. }));
        assert!(err.to_string().contains("pandoc"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_reports_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let fake = dir.path().join("pandoc");
        std::fs::write(&fake, "#!/bin/sh\necho 'unknown option' >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let converter = PandocConverter::new(Some(fake)).unwrap();
        let err = converter.to_markdown(Path::new("book.epub")).unwrap_err();
        assert_eq!(err.to_string(), "Pandoc error: unknown option\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_convert_passes_arguments() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let fake = dir.path().join("pandoc");
        let log = dir.path().join("args.txt");
        std::fs::write(
            &fake,
            format!("#!/bin/sh\nprintf '%s\\n' \"$@\" > {}\n", log.display()),
        )
        .unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let converter = PandocConverter::new(Some(fake)).unwrap();
        let options = ConvertOptions {
            toc: false,
            ..ConvertOptions::new(crate::document::Metadata::default())
        };
        converter
            .convert(Path::new("in.md"), Path::new("out.epub"), &options)
            .unwrap();

        let args = std::fs::read_to_string(&log).unwrap();
        let args: Vec<&str> = args.lines().collect();
        assert_eq!(
            args,
            vec![
                "in.md",
                "-o",
                "out.epub",
                "--metadata=title:Untitled Document",
                "--epub-chapter-level=2",
                "--standalone",
            ]
        );
    }
}
