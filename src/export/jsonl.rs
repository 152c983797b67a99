//! Line-delimited JSON sinks.
//!
//! Each append opens the file, writes one complete line, flushes and closes
//! it again, so no handle outlives a single record.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::dataset::Example;
use crate::error::ExportError;

/// Append-only JSONL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes any previous file and makes sure the parent directory exists.
    pub fn reset(&self) -> Result<(), ExportError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(self.write_error(e)),
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        Ok(())
    }

    /// Serializes `record` and appends it as a single line.
    pub fn append<T: Serialize + ?Sized>(&self, record: &T) -> Result<(), ExportError> {
        let line = serde_json::to_string(record)?;
        self.append_line(&line)
    }

    /// Appends an already serialized record followed by a newline.
    pub fn append_line(&self, line: &str) -> Result<(), ExportError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        file.write_all(&bytes).map_err(|e| self.write_error(e))?;
        file.flush().map_err(|e| self.write_error(e))
    }

    /// Current size of the file in bytes; zero when it does not exist yet.
    pub fn byte_len(&self) -> Result<u64, ExportError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(self.write_error(e)),
        }
    }

    /// Cuts the file back to `len` bytes.
    pub fn truncate(&self, len: u64) -> Result<(), ExportError> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;
        file.set_len(len).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> ExportError {
        ExportError::Write {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// The training and benchmark sinks written for every accepted example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSinks {
    pub training: JsonlSink,
    pub benchmark: JsonlSink,
}

impl DatasetSinks {
    pub fn new(training: impl Into<PathBuf>, benchmark: impl Into<PathBuf>) -> Self {
        Self {
            training: JsonlSink::new(training),
            benchmark: JsonlSink::new(benchmark),
        }
    }

    /// Truncates both sinks at the start of a run.
    pub fn reset_all(&self) -> Result<(), ExportError> {
        self.training.reset()?;
        self.benchmark.reset()
    }

    /// Writes the conversation to the training sink and the full record to
    /// the benchmark sink.
    ///
    /// Both lines are serialized before any I/O. If the benchmark append
    /// fails, the training line is cut off again so both sinks keep the same
    /// number of records.
    pub fn write_example(&self, example: &Example) -> Result<(), ExportError> {
        let training_line = serde_json::to_string(&example.messages)?;
        let benchmark_line = serde_json::to_string(example)?;

        let training_len = self.training.byte_len()?;
        self.training.append_line(&training_line)?;
        if let Err(e) = self.benchmark.append_line(&benchmark_line) {
            if let Err(rollback) = self.training.truncate(training_len) {
                tracing::error!(
                    path = %self.training.path().display(),
                    error = %rollback,
                    "Failed to roll back training line"
                );
            }
            return Err(e);
        }
        Ok(())
    }
}

/// Reads every non-blank line of a benchmark file as untyped JSON.
pub fn load_benchmark(path: impl AsRef<Path>) -> Result<Vec<Value>, ExportError> {
    Ok(load_benchmark_lines(path)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// Like [`load_benchmark`], but pairs each record with its 1-based line number.
pub fn load_benchmark_lines(path: impl AsRef<Path>) -> Result<Vec<(usize, Value)>, ExportError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ExportError::Read {
        path: path.display().to_string(),
        source,
    })?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(offset, line)| {
            serde_json::from_str(line)
                .map(|record| (offset + 1, record))
                .map_err(|source| ExportError::MalformedLine {
                    path: path.display().to_string(),
                    line: offset + 1,
                    source,
                })
        })
        .collect()
}

/// Finds a record by its `id` field.
pub fn find_record<'a>(records: &'a [Value], id: &str) -> Option<&'a Value> {
    records
        .iter()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
}
