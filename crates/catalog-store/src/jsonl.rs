//! Local output files: the append-only `products.jsonl` log and the
//! failed-URL report.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use catalog_core::ProductRecord;

use crate::OutputError;

/// Appends one compact JSON object per line, flushing after each record so
/// an interrupted run keeps everything written so far.
#[derive(Debug)]
pub struct JsonlWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl JsonlWriter {
    /// Opens `path` for appending, creating it and its parent directories
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Io`] if the directory or file cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let path = path.into();
        ensure_parent_dir(&path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| OutputError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    /// Writes `record` as one line.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Serialize`] if the record cannot be encoded, or
    /// [`OutputError::Io`] if the write or flush fails.
    pub fn append(&mut self, record: &ProductRecord) -> Result<(), OutputError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');
        self.writer
            .write_all(&line)
            .and_then(|()| self.writer.flush())
            .map_err(|source| OutputError::Io {
                path: self.path.clone(),
                source,
            })?;
        self.written += 1;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this writer.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Writes `urls` to `path`, one per line, replacing any previous report.
/// Nothing is written when `urls` is empty. Returns whether the file was
/// written.
///
/// # Errors
///
/// Returns [`OutputError::Io`] if the directory or file cannot be written.
pub fn write_failed_urls(path: &Path, urls: &[String]) -> Result<bool, OutputError> {
    if urls.is_empty() {
        return Ok(false);
    }
    ensure_parent_dir(path)?;
    let mut contents = urls.join("\n");
    contents.push('\n');
    fs::write(path, contents).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| OutputError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
