//! Unified record stream over every configured input
//!
//! [`InputFiles`] lists the inputs of a run by kind. [`InputFiles::open`]
//! returns a [`RecordStream`] that visits the sources in a fixed order:
//! paired files, single-end files, interleaved files, tab-delimited files,
//! then tab-delimited standard input. Each list keeps command-line order and
//! each source is opened only when the previous one is exhausted.

use crate::error::{OverlapperError, Result};
use crate::io::{DataSource, FastqStream, InterleavedFastqStream, PairedFastqStream, TabStream};
use crate::types::Record;
use log::debug;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Every input of a run, grouped by format
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFiles {
    /// Read 1 FASTQ files, paired positionally with `read2`
    pub read1: Vec<PathBuf>,
    /// Read 2 FASTQ files
    pub read2: Vec<PathBuf>,
    /// Single-end FASTQ files
    pub single_end: Vec<PathBuf>,
    /// Interleaved paired-end FASTQ files
    pub interleaved: Vec<PathBuf>,
    /// Tab-delimited files
    pub tab: Vec<PathBuf>,
    /// Read tab-delimited records from standard input
    pub stdin: bool,
}

impl InputFiles {
    /// Returns `true` if no input is configured
    pub fn is_empty(&self) -> bool {
        self.read1.is_empty()
            && self.read2.is_empty()
            && self.single_end.is_empty()
            && self.interleaved.is_empty()
            && self.tab.is_empty()
            && !self.stdin
    }

    /// Build the record stream over all inputs
    ///
    /// Fails if the R1 and R2 file lists differ in length. Files are not
    /// opened until the stream reaches them.
    pub fn open(&self) -> Result<RecordStream> {
        if self.read1.len() != self.read2.len() {
            return Err(OverlapperError::InvalidConfig(format!(
                "{} read 1 input(s) but {} read 2 input(s)",
                self.read1.len(),
                self.read2.len()
            )));
        }

        let mut sources = VecDeque::new();
        for (r1, r2) in self.read1.iter().zip(&self.read2) {
            sources.push_back(Source::Paired(r1.clone(), r2.clone()));
        }
        sources.extend(self.single_end.iter().cloned().map(Source::SingleEnd));
        sources.extend(self.interleaved.iter().cloned().map(Source::Interleaved));
        sources.extend(self.tab.iter().cloned().map(Source::Tab));
        if self.stdin {
            sources.push_back(Source::Stdin);
        }

        Ok(RecordStream {
            sources,
            current: None,
            finished: false,
        })
    }
}

#[derive(Debug, Clone)]
enum Source {
    Paired(PathBuf, PathBuf),
    SingleEnd(PathBuf),
    Interleaved(PathBuf),
    Tab(PathBuf),
    Stdin,
}

type BoxedRecords = Box<dyn Iterator<Item = Result<Record>>>;

impl Source {
    fn open(self) -> Result<BoxedRecords> {
        debug!("opening input {:?}", self);
        Ok(match self {
            Source::Paired(r1, r2) => {
                Box::new(PairedFastqStream::from_paths(r1, r2)?.map(|p| p.map(Record::Paired)))
            }
            Source::SingleEnd(path) => {
                Box::new(FastqStream::from_path(path)?.map(|r| r.map(Record::Single)))
            }
            Source::Interleaved(path) => {
                Box::new(InterleavedFastqStream::from_path(path)?.map(|p| p.map(Record::Paired)))
            }
            Source::Tab(path) => Box::new(TabStream::from_path(path)?),
            Source::Stdin => Box::new(TabStream::new(DataSource::stdin())?),
        })
    }
}

/// Pull-based stream of [`Record`]s drawn from several sources in turn
///
/// Stops after the first error.
pub struct RecordStream {
    sources: VecDeque<Source>,
    current: Option<BoxedRecords>,
    finished: bool,
}

impl Iterator for RecordStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(Ok(record)) => return Some(Ok(record)),
                    Some(Err(e)) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
            }

            match self.sources.pop_front() {
                Some(source) => match source.open() {
                    Ok(records) => self.current = Some(records),
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                },
                None => self.finished = true,
            }
        }
        None
    }
}
