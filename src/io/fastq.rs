//! FASTQ streaming parser
//!
//! Records are parsed one at a time from any `BufRead`; nothing beyond the
//! current record is held in memory. Blank lines between records (including
//! trailing blank lines at end of file) are skipped.

use crate::error::{OverlapperError, Result};
use crate::io::compression::{CompressedReader, DataSource};
use crate::types::Read;
use std::io::BufRead;
use std::path::Path;

/// FASTQ streaming parser
///
/// # Example
///
/// ```
/// use overlapper::FastqStream;
/// use std::io::Cursor;
///
/// # fn main() -> overlapper::Result<()> {
/// let data = b"@read1\nACGT\n+\nIIII\n\n@read2\nGG\n+\n##\n";
/// let reads = FastqStream::from_reader(Cursor::new(&data[..])).collect::<overlapper::Result<Vec<_>>>()?;
/// assert_eq!(reads.len(), 2);
/// assert_eq!(reads[1].sequence, b"GG");
/// # Ok(())
/// # }
/// ```
pub struct FastqStream<R: BufRead> {
    reader: R,
    header: String,
    sequence: String,
    separator: String,
    quality: String,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> FastqStream<R> {
    /// Create a new FASTQ stream from a buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            header: String::with_capacity(256),
            sequence: String::with_capacity(256),
            separator: String::with_capacity(8),
            quality: String::with_capacity(256),
            line_number: 0,
            finished: false,
        }
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn read_line(&mut self, which: Line) -> Result<usize> {
        let buf = match which {
            Line::Header => &mut self.header,
            Line::Sequence => &mut self.sequence,
            Line::Separator => &mut self.separator,
            Line::Quality => &mut self.quality,
        };
        buf.clear();
        let n = self.reader.read_line(buf)?;
        if n > 0 {
            self.line_number += 1;
        }
        Ok(n)
    }

    /// Read one FASTQ record from the reader
    fn read_record(&mut self) -> Result<Option<Read>> {
        // Skip blank lines before the header
        loop {
            if self.read_line(Line::Header)? == 0 {
                return Ok(None);
            }
            if !self.header.trim_end().is_empty() {
                break;
            }
        }

        if self.read_line(Line::Sequence)? == 0 {
            return Err(self.format_error("Unexpected end of file after header"));
        }
        if self.read_line(Line::Separator)? == 0 {
            return Err(self.format_error("Unexpected end of file after sequence"));
        }
        if self.read_line(Line::Quality)? == 0 {
            return Err(self.format_error("Unexpected end of file after separator"));
        }

        if !self.header.starts_with('@') {
            return Err(OverlapperError::InvalidFastqFormat {
                line: self.line_number - 3,
                msg: "id line did not begin with '@'".to_string(),
            });
        }
        if !self.separator.starts_with('+') {
            return Err(OverlapperError::InvalidFastqFormat {
                line: self.line_number - 1,
                msg: "separator line did not begin with '+'".to_string(),
            });
        }

        let id = self.header[1..].trim_end().to_string();
        let sequence = self.sequence.trim_end().as_bytes().to_vec();
        let quality = self.quality.trim_end().as_bytes().to_vec();

        if sequence.is_empty() {
            return Err(OverlapperError::InvalidFastqFormat {
                line: self.line_number - 2,
                msg: "sequence line is empty".to_string(),
            });
        }
        if sequence.len() != quality.len() {
            return Err(OverlapperError::InvalidFastqFormat {
                line: self.line_number,
                msg: format!(
                    "Sequence length ({}) != quality length ({})",
                    sequence.len(),
                    quality.len()
                ),
            });
        }

        Ok(Some(Read::new(id, sequence, quality)))
    }

    fn format_error(&self, msg: &str) -> OverlapperError {
        OverlapperError::InvalidFastqFormat {
            line: self.line_number,
            msg: msg.to_string(),
        }
    }
}

#[derive(Clone, Copy)]
enum Line {
    Header,
    Sequence,
    Separator,
    Quality,
}

impl FastqStream<CompressedReader> {
    /// Create a FASTQ stream from a data source (gzip auto-detected)
    pub fn new(source: DataSource) -> Result<Self> {
        Ok(Self::from_reader(CompressedReader::new(source)?))
    }

    /// Create a FASTQ stream from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(DataSource::from_path(path))
    }
}

impl<R: BufRead> Iterator for FastqStream<R> {
    type Item = Result<Read>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(read)) => Some(Ok(read)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
