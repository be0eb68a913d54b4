//! Paired-end FASTQ streaming (constant memory)
//!
//! Paired-end sequencing produces two reads per fragment. They arrive either
//! as two files (R1 and R2) where records at the same position belong
//! together, or as a single interleaved file alternating R1 and R2.
//!
//! Both streams yield [`ReadPair`]s one at a time and stop at the first
//! error, including a record count that does not pair up.
//!
//! # Example
//!
//! ```no_run
//! use overlapper::PairedFastqStream;
//!
//! # fn main() -> overlapper::Result<()> {
//! let paired = PairedFastqStream::from_paths("sample_R1.fq.gz", "sample_R2.fq.gz")?;
//!
//! for pair in paired {
//!     let pair = pair?;
//!     println!("R1: {}, R2: {}", pair.r1.id, pair.r2.id);
//! }
//! # Ok(())
//! # }
//! ```

use crate::error::{OverlapperError, Result};
use crate::io::{CompressedReader, DataSource, FastqStream};
use crate::types::ReadPair;
use std::io::BufRead;
use std::path::Path;

/// Paired-end FASTQ stream over two synchronized files
///
/// Returns an error if the files have different numbers of records.
pub struct PairedFastqStream<R1: BufRead, R2: BufRead> {
    stream1: FastqStream<R1>,
    stream2: FastqStream<R2>,
    record_count: usize,
    finished: bool,
}

impl PairedFastqStream<CompressedReader, CompressedReader> {
    /// Create a paired stream from two file paths
    pub fn from_paths<P1: AsRef<Path>, P2: AsRef<Path>>(path1: P1, path2: P2) -> Result<Self> {
        Self::new(DataSource::from_path(path1), DataSource::from_path(path2))
    }

    /// Create a paired stream from two data sources
    pub fn new(source1: DataSource, source2: DataSource) -> Result<Self> {
        let stream1 = FastqStream::new(source1)?;
        let stream2 = FastqStream::new(source2)?;
        Ok(Self::from_streams(stream1, stream2))
    }
}

impl<R1: BufRead, R2: BufRead> PairedFastqStream<R1, R2> {
    /// Create a paired stream from two existing FASTQ streams
    pub fn from_streams(stream1: FastqStream<R1>, stream2: FastqStream<R2>) -> Self {
        Self {
            stream1,
            stream2,
            record_count: 0,
            finished: false,
        }
    }

    /// Get the number of paired records read so far
    pub fn records_read(&self) -> usize {
        self.record_count
    }

    fn fail(&mut self, err: OverlapperError) -> Option<Result<ReadPair>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl<R1: BufRead, R2: BufRead> Iterator for PairedFastqStream<R1, R2> {
    type Item = Result<ReadPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match (self.stream1.next(), self.stream2.next()) {
            (Some(Ok(r1)), Some(Ok(r2))) => {
                self.record_count += 1;
                Some(Ok(ReadPair::new(r1, r2)))
            }

            (None, None) => {
                self.finished = true;
                None
            }

            (Some(Err(e)), _) | (_, Some(Err(e))) => self.fail(e),

            (Some(Ok(_)), None) => {
                let msg = format!(
                    "R1 file has more records than R2 (R1 continues after {} pairs)",
                    self.record_count
                );
                self.fail(OverlapperError::PairedEndLengthMismatch(msg))
            }

            (None, Some(Ok(_))) => {
                let msg = format!(
                    "R2 file has more records than R1 (R2 continues after {} pairs)",
                    self.record_count
                );
                self.fail(OverlapperError::PairedEndLengthMismatch(msg))
            }
        }
    }
}

/// Paired-end stream over one interleaved FASTQ file (R1, R2, R1, R2, ...)
pub struct InterleavedFastqStream<R: BufRead> {
    stream: FastqStream<R>,
    record_count: usize,
    finished: bool,
}

impl InterleavedFastqStream<CompressedReader> {
    /// Create an interleaved stream from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_stream(FastqStream::from_path(path)?))
    }
}

impl<R: BufRead> InterleavedFastqStream<R> {
    /// Wrap an existing FASTQ stream
    pub fn from_stream(stream: FastqStream<R>) -> Self {
        Self {
            stream,
            record_count: 0,
            finished: false,
        }
    }

    /// Get the number of pairs read so far
    pub fn records_read(&self) -> usize {
        self.record_count
    }
}

impl<R: BufRead> Iterator for InterleavedFastqStream<R> {
    type Item = Result<ReadPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = match self.stream.next() {
            None => None,
            Some(Err(e)) => Some(Err(e)),
            Some(Ok(r1)) => match self.stream.next() {
                Some(Ok(r2)) => {
                    self.record_count += 1;
                    return Some(Ok(ReadPair::new(r1, r2)));
                }
                Some(Err(e)) => Some(Err(e)),
                None => Some(Err(OverlapperError::PairedEndLengthMismatch(format!(
                    "interleaved file has an odd number of records (unpaired read '{}' after {} pairs)",
                    r1.id, self.record_count
                )))),
            },
        };
        self.finished = true;
        result
    }
}
