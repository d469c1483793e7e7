use super::MarkdownDisplay;
use crate::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Prints Markdown to standard output.
#[derive(Debug, Default)]
pub struct StdoutDisplay;

impl MarkdownDisplay for StdoutDisplay {
    fn show(&self, markdown: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", markdown)?;
        writeln!(stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Appends Markdown to a file, one blank line between entries.
#[derive(Debug)]
pub struct FileDisplay {
    path: PathBuf,
}

impl FileDisplay {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MarkdownDisplay for FileDisplay {
    fn show(&self, markdown: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", markdown)?;
        writeln!(file)?;
        tracing::debug!("Appended {} bytes to {}", markdown.len(), self.path.display());
        Ok(())
    }
}
