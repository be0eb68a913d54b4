//! Record writers
//!
//! A [`ReadSink`] accepts either a pair or a single read. Writers always emit
//! the active (trim-adjusted) range of a read; a single read written with
//! `rc = true` is emitted as the reverse complement of that range.
//!
//! [`write_record`] applies the output policy for discarded reads and
//! orphans on top of any sink.

use crate::error::Result;
use crate::io::{CompressedWriter, DataSink};
use crate::operations::sequence::reverse_complement;
use crate::types::{Read, ReadPair, Record};
use std::io::Write;

/// Destination for records leaving the pipeline
pub trait ReadSink {
    /// Write both reads of a pair to the paired outputs
    fn write_pair(&mut self, pair: &ReadPair) -> Result<()>;

    /// Write one read to the single-end output, reverse complemented if `rc`
    fn write_single(&mut self, read: &Read, rc: bool) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()>;
}

/// Write one FASTQ record for the active range of `read`
pub fn write_fastq<W: Write>(writer: &mut W, read: &Read, rc: bool) -> Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(read.id.as_bytes())?;
    writer.write_all(b"\n")?;
    if rc {
        writer.write_all(&reverse_complement(read.sub_seq()))?;
        writer.write_all(b"\n+\n")?;
        let qual: Vec<u8> = read.sub_qual().iter().rev().copied().collect();
        writer.write_all(&qual)?;
    } else {
        writer.write_all(read.sub_seq())?;
        writer.write_all(b"\n+\n")?;
        writer.write_all(read.sub_qual())?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

fn write_tab_fields<W: Write>(writer: &mut W, read: &Read, rc: bool) -> Result<()> {
    writer.write_all(read.id.as_bytes())?;
    writer.write_all(b"\t")?;
    if rc {
        writer.write_all(&reverse_complement(read.sub_seq()))?;
        writer.write_all(b"\t")?;
        let qual: Vec<u8> = read.sub_qual().iter().rev().copied().collect();
        writer.write_all(&qual)?;
    } else {
        writer.write_all(read.sub_seq())?;
        writer.write_all(b"\t")?;
        writer.write_all(read.sub_qual())?;
    }
    Ok(())
}

/// FASTQ output split across R1, R2 and single-end writers
///
/// # Example
///
/// ```
/// use overlapper::io::{FastqSink, ReadSink};
/// use overlapper::Read;
///
/// # fn main() -> overlapper::Result<()> {
/// let mut sink = FastqSink::new(Vec::new(), Vec::new(), Vec::new());
/// let read = Read::new("m".to_string(), b"AACG".to_vec(), b"ABCD".to_vec());
/// sink.write_single(&read, true)?;
///
/// let (_, _, se) = sink.into_inner();
/// assert_eq!(se, b"@m\nCGTT\n+\nDCBA\n");
/// # Ok(())
/// # }
/// ```
pub struct FastqSink<W: Write> {
    r1: W,
    r2: W,
    se: W,
}

impl<W: Write> FastqSink<W> {
    /// Create a sink over three writers
    pub fn new(r1: W, r2: W, se: W) -> Self {
        Self { r1, r2, se }
    }

    /// Recover the R1, R2 and single-end writers
    pub fn into_inner(self) -> (W, W, W) {
        (self.r1, self.r2, self.se)
    }
}

impl FastqSink<CompressedWriter> {
    /// Create `<prefix>R1.fastq`, `<prefix>R2.fastq` and `<prefix>SE.fastq`
    /// (each with `.gz` appended when `gzip`)
    ///
    /// Existing files are only replaced when `force` is set.
    pub fn from_prefix(prefix: &str, gzip: bool, force: bool) -> Result<Self> {
        let open = |suffix: &str| {
            CompressedWriter::create(DataSink::with_prefix(prefix, suffix, "fastq", gzip), force)
        };
        Ok(Self::new(open("R1")?, open("R2")?, open("SE")?))
    }

    /// Flush and finalize all three files
    pub fn close(self) -> Result<()> {
        self.r1.finish()?;
        self.r2.finish()?;
        self.se.finish()?;
        Ok(())
    }
}

impl<W: Write> ReadSink for FastqSink<W> {
    fn write_pair(&mut self, pair: &ReadPair) -> Result<()> {
        write_fastq(&mut self.r1, &pair.r1, false)?;
        write_fastq(&mut self.r2, &pair.r2, false)
    }

    fn write_single(&mut self, read: &Read, rc: bool) -> Result<()> {
        write_fastq(&mut self.se, read, rc)
    }

    fn flush(&mut self) -> Result<()> {
        self.r1.flush()?;
        self.r2.flush()?;
        self.se.flush()?;
        Ok(())
    }
}

/// Tab-delimited output on a single stream
///
/// Single reads are written as 3 fields, pairs as 6 fields.
pub struct TabSink<W: Write> {
    out: W,
}

impl<W: Write> TabSink<W> {
    /// Create a sink over one writer
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TabSink<CompressedWriter> {
    /// Write to `<prefix>.tab6` (with `.gz` appended when `gzip`)
    pub fn from_prefix(prefix: &str, gzip: bool, force: bool) -> Result<Self> {
        let sink = DataSink::with_prefix(prefix, "", "tab6", gzip);
        Ok(Self::new(CompressedWriter::create(sink, force)?))
    }

    /// Write to standard output
    pub fn stdout() -> Result<Self> {
        Ok(Self::new(CompressedWriter::new(DataSink::stdout())?))
    }

    /// Flush and finalize the output
    pub fn close(self) -> Result<()> {
        self.out.finish()?;
        Ok(())
    }
}

impl<W: Write> ReadSink for TabSink<W> {
    fn write_pair(&mut self, pair: &ReadPair) -> Result<()> {
        write_tab_fields(&mut self.out, &pair.r1, false)?;
        self.out.write_all(b"\t")?;
        write_tab_fields(&mut self.out, &pair.r2, false)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn write_single(&mut self, read: &Read, rc: bool) -> Result<()> {
        write_tab_fields(&mut self.out, read, rc)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Write `record` according to its reads' discard flags
///
/// - A pair with neither read discarded goes to the paired outputs.
/// - If only one read of a pair survives it is written as a single-end
///   orphan (R2 reverse complemented when `stranded`), unless `no_orphans`.
/// - A single read is written unless discarded.
pub fn write_record<S: ReadSink + ?Sized>(
    sink: &mut S,
    record: &Record,
    stranded: bool,
    no_orphans: bool,
) -> Result<()> {
    match record {
        Record::Paired(pair) => match (pair.r1.discard(), pair.r2.discard()) {
            (false, false) => sink.write_pair(pair),
            (false, true) if !no_orphans => sink.write_single(&pair.r1, false),
            (true, false) if !no_orphans => sink.write_single(&pair.r2, stranded),
            _ => Ok(()),
        },
        Record::Single(read) if !read.discard() => sink.write_single(read, false),
        Record::Single(_) => Ok(()),
    }
}
