/*!
 * Bounded line scanner for JSONL input
 */

use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};

use crate::error::{Result, SplitError};

/// Reads one record at a time into a caller-owned buffer.
///
/// Lines are split on `\n`; a trailing `\r` is dropped. A final line without
/// a newline is still returned. Never buffers more than `max_line_size + 1`
/// bytes for a single line.
pub struct LineReader<R> {
    inner: R,
    path: PathBuf,
    max_line_size: usize,
    line: u64,
    bytes_read: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, path: &Path, max_line_size: usize) -> Self {
        Self {
            inner,
            path: path.to_path_buf(),
            max_line_size,
            line: 0,
            bytes_read: 0,
        }
    }

    /// Read the next line into `buf` (without its terminator).
    ///
    /// Returns `Ok(false)` at end of input.
    pub fn next_record(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();

        let limit = self.max_line_size as u64 + 1;
        let n = (&mut self.inner)
            .take(limit)
            .read_until(b'\n', buf)
            .map_err(|source| SplitError::Read {
                path: self.path.clone(),
                line: self.line + 1,
                source,
            })?;

        if n == 0 {
            return Ok(false);
        }

        self.line += 1;
        self.bytes_read += n as u64;

        if buf.last() == Some(&b'\n') {
            buf.pop();
        } else if n as u64 == limit {
            return Err(SplitError::LineTooLong {
                path: self.path.clone(),
                line: self.line,
                limit: self.max_line_size,
            });
        }

        if buf.last() == Some(&b'\r') {
            buf.pop();
        }

        Ok(true)
    }

    /// 1-based number of the last line returned (blank lines included)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Input bytes consumed so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str, max: usize) -> Result<Vec<String>> {
        let mut reader = LineReader::new(Cursor::new(input.as_bytes()), Path::new("in.jsonl"), max);
        let mut buf = Vec::new();
        let mut lines = Vec::new();
        while reader.next_record(&mut buf)? {
            lines.push(String::from_utf8(buf.clone()).unwrap());
        }
        Ok(lines)
    }

    #[test]
    fn test_splits_lines() {
        let lines = read_all("a\nb\n\nc\n", 16).unwrap();
        assert_eq!(lines, vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_final_line_without_newline() {
        let lines = read_all("a\nlast", 16).unwrap();
        assert_eq!(lines, vec!["a", "last"]);
    }

    #[test]
    fn test_crlf_is_stripped() {
        let lines = read_all("a\r\nb\r\n", 16).unwrap();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_all("", 16).unwrap().is_empty());
    }

    #[test]
    fn test_line_at_limit_is_accepted() {
        let lines = read_all("1234\n12345678\n", 8).unwrap();
        assert_eq!(lines, vec!["1234", "12345678"]);

        let lines = read_all("12345678", 8).unwrap();
        assert_eq!(lines, vec!["12345678"]);
    }

    #[test]
    fn test_line_over_limit_is_fatal() {
        let mut reader = LineReader::new(
            Cursor::new(b"ok\n\n123456789\nafter\n".as_slice()),
            Path::new("in.jsonl"),
            8,
        );
        let mut buf = Vec::new();
        assert!(reader.next_record(&mut buf).unwrap());
        assert!(reader.next_record(&mut buf).unwrap());

        let err = reader.next_record(&mut buf).unwrap_err();
        match err {
            SplitError::LineTooLong { line, limit, .. } => {
                assert_eq!(line, 3);
                assert_eq!(limit, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tracks_line_numbers_and_bytes() {
        let mut reader = LineReader::new(
            Cursor::new(b"ab\n\ncd\n".as_slice()),
            Path::new("in.jsonl"),
            16,
        );
        let mut buf = Vec::new();
        while reader.next_record(&mut buf).unwrap() {}
        assert_eq!(reader.line(), 3);
        assert_eq!(reader.bytes_read(), 7);
    }
}
