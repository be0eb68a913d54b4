//! Output destinations for streaming writes
//!
//! `DataSink` is the write counterpart to [`DataSource`](crate::io::DataSource).

use std::path::{Path, PathBuf};

/// Output destination for streaming writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSink {
    /// Write to a local file path (`.gz` selects gzip compression)
    Local(PathBuf),
    /// Write to standard output (always uncompressed)
    Stdout,
}

impl DataSink {
    /// Create a sink from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self::Local(path.as_ref().to_path_buf())
    }

    /// Create a sink for standard output
    pub fn stdout() -> Self {
        Self::Stdout
    }

    /// Sink for `<prefix><suffix>.<ext>`, with `.gz` appended when `gzip`
    ///
    /// # Example
    ///
    /// ```
    /// use overlapper::io::DataSink;
    ///
    /// let sink = DataSink::with_prefix("out/sample_", "R1", "fastq", true);
    /// assert_eq!(sink, DataSink::from_path("out/sample_R1.fastq.gz"));
    /// assert!(sink.is_compressed());
    /// ```
    pub fn with_prefix(prefix: &str, suffix: &str, ext: &str, gzip: bool) -> Self {
        let mut name = format!("{prefix}{suffix}.{ext}");
        if gzip {
            name.push_str(".gz");
        }
        Self::Local(PathBuf::from(name))
    }

    pub(crate) fn extension(&self) -> Option<&str> {
        match self {
            Self::Local(path) => path.extension().and_then(|s| s.to_str()),
            Self::Stdout => None,
        }
    }

    /// Check if this sink represents a compressed output
    pub fn is_compressed(&self) -> bool {
        matches!(self.extension(), Some("gz") | Some("gzip"))
    }
}
