/*!
 * One output file per category
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// An open, buffered output file owned by exactly one category
#[derive(Debug)]
pub struct OutputStream {
    category: String,
    path: PathBuf,
    writer: BufWriter<File>,
    records: u64,
    bytes: u64,
}

impl OutputStream {
    /// Create (or truncate) the destination file
    pub fn create(category: &str, path: PathBuf, buffer_size: usize) -> io::Result<Self> {
        let file = File::create(&path)?;
        Ok(Self {
            category: category.to_string(),
            path,
            writer: BufWriter::with_capacity(buffer_size, file),
            records: 0,
            bytes: 0,
        })
    }

    /// Append one record followed by a single newline
    pub fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        self.writer.write_all(record)?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        self.bytes += record.len() as u64 + 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush remaining buffered bytes and release the file handle
    pub fn close(self) -> io::Result<()> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        drop(file);
        Ok(())
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written so far
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Bytes written so far, newlines included
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}
