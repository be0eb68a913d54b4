//! Tab-delimited read format
//!
//! One record per line, fields separated by `\t`:
//!
//! | fields | shape      | layout                                   |
//! |--------|------------|------------------------------------------|
//! | 3      | single-end | `id seq qual`                            |
//! | 5      | paired     | `id seq1 qual1 seq2 qual2` (shared id)   |
//! | 6      | paired     | `id1 seq1 qual1 id2 seq2 qual2`          |
//!
//! Any other field count cannot be mapped to a [`Record`] and is reported as
//! [`OverlapperError::UnrecognizedRecord`], which aborts the run.

use crate::error::{OverlapperError, Result};
use crate::io::{CompressedReader, DataSource};
use crate::types::{Read, ReadPair, Record};
use std::io::BufRead;
use std::path::Path;

/// Streaming parser for tab-delimited reads
///
/// # Example
///
/// ```
/// use overlapper::{Record, TabStream};
/// use std::io::Cursor;
///
/// # fn main() -> overlapper::Result<()> {
/// let data = b"r1\tACGT\tIIII\nr2\tAC\tII\tGT\tII\n";
/// let records = TabStream::from_reader(Cursor::new(&data[..])).collect::<overlapper::Result<Vec<_>>>()?;
/// assert!(matches!(records[0], Record::Single(_)));
/// assert!(matches!(records[1], Record::Paired(_)));
/// # Ok(())
/// # }
/// ```
pub struct TabStream<R: BufRead> {
    reader: R,
    line: String,
    line_number: usize,
    finished: bool,
}

impl TabStream<CompressedReader> {
    /// Create a tab stream from a data source (gzip auto-detected)
    pub fn new(source: DataSource) -> Result<Self> {
        Ok(Self::from_reader(CompressedReader::new(source)?))
    }

    /// Create a tab stream from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(DataSource::from_path(path))
    }
}

impl<R: BufRead> TabStream<R> {
    /// Create a tab stream from a buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line: String::with_capacity(512),
            line_number: 0,
            finished: false,
        }
    }

    fn read_record(&mut self) -> Result<Option<Record>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            if !self.line.trim_end().is_empty() {
                break;
            }
        }

        let line_number = self.line_number;
        let fields: Vec<&str> = self.line.trim_end_matches(&['\n', '\r'][..]).split('\t').collect();

        let record = match fields.as_slice() {
            [id, seq, qual] => Record::Single(make_read(id, seq, qual, line_number)?),
            [id, seq1, qual1, seq2, qual2] => Record::Paired(ReadPair::new(
                make_read(id, seq1, qual1, line_number)?,
                make_read(id, seq2, qual2, line_number)?,
            )),
            [id1, seq1, qual1, id2, seq2, qual2] => Record::Paired(ReadPair::new(
                make_read(id1, seq1, qual1, line_number)?,
                make_read(id2, seq2, qual2, line_number)?,
            )),
            other => {
                return Err(OverlapperError::UnrecognizedRecord {
                    line: line_number,
                    fields: other.len(),
                })
            }
        };
        Ok(Some(record))
    }
}

fn make_read(id: &str, seq: &str, qual: &str, line: usize) -> Result<Read> {
    if seq.is_empty() {
        return Err(OverlapperError::InvalidTabFormat {
            line,
            msg: format!("read '{}' has an empty sequence", id),
        });
    }
    if seq.len() != qual.len() {
        return Err(OverlapperError::InvalidTabFormat {
            line,
            msg: format!(
                "read '{}': sequence length ({}) != quality length ({})",
                id,
                seq.len(),
                qual.len()
            ),
        });
    }
    Ok(Read::new(
        id.to_string(),
        seq.as_bytes().to_vec(),
        qual.as_bytes().to_vec(),
    ))
}

impl<R: BufRead> Iterator for TabStream<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
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
