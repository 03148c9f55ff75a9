//! Page sink trait and the newline-delimited text file implementation

use crate::url::PageUrl;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("Output writer lock poisoned")]
    Poisoned,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for page records
///
/// Implementations must serialize concurrent writers themselves; workers call
/// `record_page` from many tasks at once.
pub trait PageSink: Send + Sync {
    /// Appends one newly admitted page
    fn record_page(&self, url: &PageUrl) -> OutputResult<()>;

    /// Flushes everything written so far
    fn finalize(&self) -> OutputResult<()>;
}

/// Append-only text file, one URL per line
pub struct TextFileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl TextFileSink {
    /// Creates (or truncates) the file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path).map_err(|source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl PageSink for TextFileSink {
    fn record_page(&self, url: &PageUrl) -> OutputResult<()> {
        let mut writer = self.writer.lock().map_err(|_| OutputError::Poisoned)?;
        writeln!(writer, "{}", url)?;
        Ok(())
    }

    fn finalize(&self) -> OutputResult<()> {
        let mut writer = self.writer.lock().map_err(|_| OutputError::Poisoned)?;
        writer.flush()?;
        tracing::debug!("Flushed page list to {}", self.path.display());
        Ok(())
    }
}
