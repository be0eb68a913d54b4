//! overlapper: streaming paired-end read overlap merging
//!
//! # Overview
//!
//! When a sequenced fragment is shorter than the combined length of its two
//! reads, the reads overlap. overlapper detects ungapped overlaps between the
//! reads of each pair and collapses them into a single consensus read, with
//! boosted qualities where the reads agree and adapter read-through removed.
//!
//! Records are streamed one at a time from FASTQ (single, paired, interleaved)
//! or tab-delimited input, so memory use does not grow with input size.
//!
//! ## Quick Start
//!
//! ```no_run
//! use overlapper::io::{FastqSink, InputFiles};
//! use overlapper::{OverlapConfig, OverlapStats, Overlapper};
//!
//! # fn main() -> overlapper::Result<()> {
//! let inputs = InputFiles {
//!     read1: vec!["sample_R1.fq.gz".into()],
//!     read2: vec!["sample_R2.fq.gz".into()],
//!     ..InputFiles::default()
//! };
//!
//! let overlapper = Overlapper::new(OverlapConfig::default())?;
//! let mut sink = FastqSink::from_prefix("overlapped_", true, false)?;
//! let mut stats = OverlapStats::new();
//!
//! overlapper.run(inputs.open()?, &mut sink, &mut stats)?;
//! sink.close()?;
//! stats.write_report("stats.log", "overlapper", "", false)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`io`]: streaming parsers, writers and compression
//! - [`operations`]: reverse complement, k-mer index and the overlap engine
//! - [`overlapper`]: per-record orchestration and insert classification
//! - [`stats`]: run counters and the JSON stats report

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod operations;
pub mod overlapper;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use config::OverlapConfig;
pub use error::{OverlapperError, Result};
pub use io::{FastqStream, InterleavedFastqStream, PairedFastqStream, TabStream};
pub use overlapper::{InsertClassification, Overlapper, PairOutcome};
pub use stats::OverlapStats;
pub use types::{Read, ReadPair, Record};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
