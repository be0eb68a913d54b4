//! Error types for overlapper

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for overlapper operations
pub type Result<T> = std::result::Result<T, OverlapperError>;

/// Error types that can occur in overlapper
#[derive(Debug, Error)]
pub enum OverlapperError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid FASTQ format
    #[error("Invalid FASTQ format at line {line}: {msg}")]
    InvalidFastqFormat {
        /// Line number where error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// Invalid tab-delimited format
    #[error("Invalid tab-delimited format at line {line}: {msg}")]
    InvalidTabFormat {
        /// Line number where error occurred
        line: usize,
        /// Error message
        msg: String,
    },

    /// A record whose shape is neither single-end nor paired-end.
    ///
    /// This is a contract violation by the input, not a per-record data
    /// problem, and it aborts the run.
    #[error("Unrecognized record at line {line}: {fields} tab-delimited fields (expected 3, 5 or 6)")]
    UnrecognizedRecord {
        /// Line number where error occurred
        line: usize,
        /// Number of fields found on the line
        fields: usize,
    },

    /// Paired-end inputs have different record counts
    #[error("Paired-end inputs have different lengths: {0}")]
    PairedEndLengthMismatch(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Output file already exists and overwriting was not requested
    #[error("Output file {0} already exists (use --force to overwrite)")]
    OutputExists(PathBuf),

    /// Statistics report could not be encoded or parsed
    #[error("Stats report error: {0}")]
    Report(#[from] serde_json::Error),
}
