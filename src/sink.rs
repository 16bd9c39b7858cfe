//! Append-only CSV output
//!
//! One row per processed post, no header. Every row is flushed as soon as it
//! is written so an interrupted run keeps everything processed so far.

use std::fs::File;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::errors::Result;

pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: u64,
}

impl CsvSink {
    /// Create (or truncate) the file at `path`, creating parent directories
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Open the file at `path` for appending, creating it if needed
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);

        debug!("Writing rows to {}", path.display());
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows_written: 0,
        })
    }

    pub fn write_row<S: AsRef<[u8]>>(&mut self, fields: &[S]) -> Result<()> {
        self.writer.write_record(fields)?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
