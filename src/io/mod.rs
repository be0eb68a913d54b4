//! I/O module: streaming parsers, writers and compression
//!
//! Every reader pulls one record at a time, so memory use does not depend on
//! input size.

pub mod compression;
mod fastq;
mod paired;
mod records;
pub mod sink;
mod tab;
mod writer;

pub use compression::{CompressedReader, CompressedWriter, DataSource, MMAP_THRESHOLD};
pub use fastq::FastqStream;
pub use paired::{InterleavedFastqStream, PairedFastqStream};
pub use records::{InputFiles, RecordStream};
pub use sink::DataSink;
pub use tab::TabStream;
pub use writer::{write_fastq, write_record, FastqSink, ReadSink, TabSink};
