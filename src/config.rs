//! Run configuration for overlap detection
//!
//! All values are fixed for the duration of a run.

use crate::error::{OverlapperError, Result};

/// Default fraction of the overlap window allowed to mismatch
pub const DEFAULT_MISMATCH_DENSITY: f64 = 0.25;
/// Default minimum overlap (bases); windows must be strictly longer
pub const DEFAULT_MIN_OVERLAP: usize = 8;
/// Default minimum length of a merged read
pub const DEFAULT_MIN_LENGTH: usize = 50;
/// Default k-mer length used to anchor candidate overlaps
pub const DEFAULT_KMER: usize = 8;
/// Default k-mer sampling stride over the longer read
pub const DEFAULT_KMER_OFFSET: usize = 1;
/// Default number of positions probed at each edge of the shorter read
pub const DEFAULT_CHECK_LENGTHS: usize = 20;

/// Parameters consumed by the overlap engine and the orchestrator
///
/// # Examples
///
/// ```
/// use overlapper::OverlapConfig;
///
/// let config = OverlapConfig {
///     min_length: 30,
///     ..OverlapConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapConfig {
    /// Fraction of the overlap window permitted to mismatch
    pub mismatch_density: f64,
    /// Overlap windows must be strictly longer than this
    pub min_overlap: usize,
    /// Merged reads shorter than this are treated as "no overlap"
    pub min_length: usize,
    /// K-mer length
    pub kmer: usize,
    /// K-mer sampling stride over the longer read
    pub kmer_offset: usize,
    /// Number of edge positions probed on each side of the shorter read
    pub check_lengths: usize,
    /// Reverse complement orphaned R2 reads on output
    pub stranded: bool,
    /// Drop orphaned reads instead of writing them as single-end
    pub no_orphans: bool,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            mismatch_density: DEFAULT_MISMATCH_DENSITY,
            min_overlap: DEFAULT_MIN_OVERLAP,
            min_length: DEFAULT_MIN_LENGTH,
            kmer: DEFAULT_KMER,
            kmer_offset: DEFAULT_KMER_OFFSET,
            check_lengths: DEFAULT_CHECK_LENGTHS,
            stranded: false,
            no_orphans: false,
        }
    }
}

impl OverlapConfig {
    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<()> {
        if self.kmer == 0 {
            return Err(OverlapperError::InvalidConfig(
                "k-mer length must be at least 1".to_string(),
            ));
        }
        if self.kmer_offset == 0 {
            return Err(OverlapperError::InvalidConfig(
                "k-mer offset must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mismatch_density) {
            return Err(OverlapperError::InvalidConfig(format!(
                "mismatch density must be within [0, 1], got {}",
                self.mismatch_density
            )));
        }
        Ok(())
    }
}
