//! Pull-based line stream over a transcript file.
//!
//! Lines are yielded as raw bytes so an invalid UTF-8 line is just another
//! malformed record for the decoder, not a stream failure. Only one line is
//! held in memory at a time.

use fs_err as fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// One non-blank line, with its 1-based line number in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub bytes: Vec<u8>,
}

pub struct TranscriptLines<R> {
    reader: R,
    line_no: usize,
    failed: bool,
}

impl TranscriptLines<BufReader<fs::File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> TranscriptLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for TranscriptLines<R> {
    type Item = io::Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let mut buf = Vec::new();
            match self.reader.read_until(b'\n', &mut buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    if buf.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    while matches!(buf.last(), Some(b'\n' | b'\r')) {
                        buf.pop();
                    }
                    return Some(Ok(RawLine {
                        number: self.line_no,
                        bytes: buf,
                    }));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    // Single-pass: after an error the stream is over.
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
