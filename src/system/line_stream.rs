//! Forward-only line reader over a level file
//!
//! Every level section parser pulls its lines from one shared `LineStream`,
//! so each parser must consume exactly the lines of its own section.
//!
//! Lines are bounded: anything past `max_line_length - 1` bytes is dropped
//! and the cursor moves on to the next physical line.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

pub struct LineStream {
    reader: BufReader<Box<dyn Read>>,
    raw: Vec<u8>,
    line: String,
    max_line_length: usize,
}

impl LineStream {
    /// Open a file for line-by-line reading.
    pub fn open(path: &Path, max_line_length: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(file, max_line_length))
    }

    /// Wrap any reader (used by tests to feed in-memory level data).
    pub fn from_reader<R: Read + 'static>(reader: R, max_line_length: usize) -> Self {
        assert!(max_line_length > 1, "line buffer must hold at least one byte");
        Self {
            reader: BufReader::new(Box::new(reader)),
            raw: Vec::with_capacity(max_line_length),
            line: String::with_capacity(max_line_length),
            max_line_length,
        }
    }

    /// Next line without its line terminator, or `None` at end of stream.
    ///
    /// At most `max_line_length` bytes of a line are ever buffered; the rest
    /// is skipped in place. A read error ends the stream; the section parser
    /// waiting for the line then reports it as truncated input.
    pub fn next_line(&mut self) -> Option<&str> {
        self.raw.clear();
        let limit = self.max_line_length as u64;
        match (&mut self.reader).take(limit).read_until(b'\n', &mut self.raw) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "could not read next line");
                return None;
            }
        }

        if self.raw.last() != Some(&b'\n') && self.raw.len() as u64 == limit {
            if let Err(e) = self.skip_rest_of_line() {
                tracing::error!(error = %e, "could not skip past long line");
            }
        }

        while matches!(self.raw.last(), Some(b'\n') | Some(b'\r')) {
            self.raw.pop();
        }
        self.raw.truncate(self.max_line_length - 1);

        self.line.clear();
        self.line.push_str(&String::from_utf8_lossy(&self.raw));
        Some(&self.line)
    }

    /// Consume up to and including the next `\n` without keeping anything.
    fn skip_rest_of_line(&mut self) -> io::Result<()> {
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(());
            }
            match buf.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    self.reader.consume(i + 1);
                    return Ok(());
                }
                None => {
                    let n = buf.len();
                    self.reader.consume(n);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn stream(text: &str, max: usize) -> LineStream {
        LineStream::from_reader(Cursor::new(text.as_bytes().to_vec()), max)
    }

    #[test]
    fn test_reads_lines_in_order() {
        let mut s = stream("first\nsecond\r\nthird", 64);
        assert_eq!(s.next_line(), Some("first"));
        assert_eq!(s.next_line(), Some("second"));
        assert_eq!(s.next_line(), Some("third"));
        assert_eq!(s.next_line(), None);
        assert_eq!(s.next_line(), None);
    }

    #[test]
    fn test_long_lines_are_truncated() {
        let mut s = stream("abcdefghij\nnext\n", 5);
        assert_eq!(s.next_line(), Some("abcd"));
        assert_eq!(s.next_line(), Some("next"));
    }

    #[test]
    fn test_truncated_line_with_crlf() {
        let mut s = stream("abcd\r\nnext\r\n", 5);
        assert_eq!(s.next_line(), Some("abcd"));
        assert_eq!(s.next_line(), Some("next"));
        assert_eq!(s.next_line(), None);
    }

    #[test]
    fn test_huge_line_is_not_buffered() {
        let huge = io::repeat(b'a').take(8 * 1024 * 1024);
        let tail = Cursor::new(b"\nafter\n".to_vec());
        let mut s = LineStream::from_reader(huge.chain(tail), 512);

        assert_eq!(s.next_line().map(str::len), Some(511));
        assert!(s.raw.capacity() < 4096, "raw buffer grew to {}", s.raw.capacity());
        assert_eq!(s.next_line(), Some("after"));
        assert_eq!(s.next_line(), None);
    }

    #[test]
    fn test_huge_line_without_newline_ends_stream() {
        let mut s = LineStream::from_reader(io::repeat(b'x').take(1024 * 1024), 64);
        assert_eq!(s.next_line().map(str::len), Some(63));
        assert!(s.raw.capacity() < 4096);
        assert_eq!(s.next_line(), None);
    }

    #[test]
    fn test_empty_lines_are_lines() {
        let mut s = stream("\n\nx\n", 16);
        assert_eq!(s.next_line(), Some(""));
        assert_eq!(s.next_line(), Some(""));
        assert_eq!(s.next_line(), Some("x"));
        assert_eq!(s.next_line(), None);
    }

    #[test]
    fn test_open_missing_file_reports_os_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LineStream::open(&dir.path().join("missing.txt"), 512)
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.txt");
        std::fs::write(&path, "ff0000\n1 2 ffffff\n").unwrap();

        let mut s = LineStream::open(&path, 512).unwrap();
        assert_eq!(s.next_line(), Some("ff0000"));
        assert_eq!(s.next_line(), Some("1 2 ffffff"));
        assert_eq!(s.next_line(), None);
    }
}
