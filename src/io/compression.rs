//! Input sources and output writers with transparent gzip support
//!
//! - [`DataSource`] opens a local file or stdin; large local files are
//!   memory-mapped.
//! - [`CompressedReader`] sniffs the gzip magic bytes and decompresses
//!   (including multi-member gzip, as produced by `cat a.gz b.gz`).
//! - [`CompressedWriter`] writes plain or gzip output, selected by the
//!   `.gz` extension of the sink path.

use crate::error::{OverlapperError, Result};
use crate::io::DataSink;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Local files at least this large are memory-mapped instead of read through
/// a `BufReader`
pub const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024;

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Where records are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local file path
    Local(PathBuf),
    /// Standard input
    Stdin,
}

impl DataSource {
    /// Create a local file data source
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        DataSource::Local(path.as_ref().to_path_buf())
    }

    /// Create a data source reading standard input
    pub fn stdin() -> Self {
        DataSource::Stdin
    }

    /// Open the data source and return a buffered reader
    pub fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        match self {
            DataSource::Local(path) => open_local_file(path),
            DataSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Local(path) => write!(f, "{}", path.display()),
            DataSource::Stdin => write!(f, "<stdin>"),
        }
    }
}

fn open_local_file(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file_size = std::fs::metadata(path)?.len();

    if file_size >= MMAP_THRESHOLD {
        debug!("memory-mapping {} ({} bytes)", path.display(), file_size);
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and input files are not expected
        // to be modified while a run is in progress.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Box::new(io::Cursor::new(mmap)))
    } else {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Buffered reader that transparently decompresses gzip input
///
/// # Example
///
/// ```no_run
/// use overlapper::io::{CompressedReader, DataSource};
///
/// # fn main() -> overlapper::Result<()> {
/// let reader = CompressedReader::new(DataSource::from_path("reads_R1.fq.gz"))?;
/// # Ok(())
/// # }
/// ```
pub struct CompressedReader {
    inner: Box<dyn BufRead + Send>,
}

impl CompressedReader {
    /// Open `source`, decompressing if it starts with the gzip magic bytes
    pub fn new(source: DataSource) -> Result<Self> {
        let reader = source.open()?;
        Self::from_reader(reader)
    }

    /// Wrap an already-open reader, decompressing if needed
    pub fn from_reader(mut reader: Box<dyn BufRead + Send>) -> Result<Self> {
        let is_gzipped = {
            let peeked = reader.fill_buf()?;
            peeked.len() >= 2 && peeked[..2] == GZIP_MAGIC
        };

        if is_gzipped {
            Ok(Self {
                inner: Box::new(BufReader::new(MultiGzDecoder::new(reader))),
            })
        } else {
            Ok(Self { inner: reader })
        }
    }
}

impl Read for CompressedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl BufRead for CompressedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt)
    }
}

/// Plain or gzip-compressed output
///
/// Call [`CompressedWriter::finish`] to finalize the gzip stream and surface
/// any error; dropping only flushes on a best-effort basis.
pub enum CompressedWriter {
    /// Uncompressed writer with buffering
    Plain(Option<BufWriter<Box<dyn Write>>>),
    /// Gzip compressed writer
    Gzip(Option<GzEncoder<BufWriter<Box<dyn Write>>>>),
}

impl CompressedWriter {
    /// Create a writer for `sink`, replacing any existing file
    ///
    /// Compression is selected from the path extension: `.gz` writes gzip,
    /// anything else (and stdout) is uncompressed.
    pub fn new(sink: DataSink) -> io::Result<Self> {
        let gzip = sink.is_compressed();
        match sink {
            DataSink::Local(path) => {
                let file = File::create(&path)?;
                if gzip {
                    Self::new_gzip(Box::new(file))
                } else {
                    Self::new_plain(Box::new(file))
                }
            }
            DataSink::Stdout => Self::new_plain(Box::new(io::stdout())),
        }
    }

    /// Create a writer for `sink`, refusing to replace an existing file
    /// unless `force` is set
    pub fn create(sink: DataSink, force: bool) -> Result<Self> {
        if let DataSink::Local(path) = &sink {
            if !force && path.exists() {
                return Err(OverlapperError::OutputExists(path.clone()));
            }
        }
        Ok(Self::new(sink)?)
    }

    /// Create a plain (uncompressed) writer
    pub fn new_plain(writer: Box<dyn Write>) -> io::Result<Self> {
        Ok(Self::Plain(Some(BufWriter::new(writer))))
    }

    /// Create a gzip writer with the default compression level
    pub fn new_gzip(writer: Box<dyn Write>) -> io::Result<Self> {
        let encoder = GzEncoder::new(BufWriter::new(writer), Compression::default());
        Ok(Self::Gzip(Some(encoder)))
    }

    /// Flush buffered data without finalizing the stream
    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(Some(w)) => w.flush(),
            Self::Gzip(Some(w)) => w.flush(),
            _ => Ok(()),
        }
    }

    /// Flush and finalize the stream
    pub fn finish(mut self) -> io::Result<()> {
        match &mut self {
            Self::Plain(w) => match w.take() {
                Some(mut writer) => writer.flush(),
                None => Ok(()),
            },
            Self::Gzip(w) => match w.take() {
                Some(encoder) => encoder.finish()?.flush(),
                None => Ok(()),
            },
        }
    }
}

impl Write for CompressedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(Some(w)) => w.write(buf),
            Self::Gzip(Some(w)) => w.write(buf),
            _ => Err(io::Error::new(
                io::ErrorKind::Other,
                "Cannot write to finished writer",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        CompressedWriter::flush(self)
    }
}

impl Drop for CompressedWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
