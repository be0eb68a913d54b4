//! Common types used throughout overlapper

use crate::operations::sequence::reverse_complement;

/// A sequencing read
///
/// Owns the raw sequence and Phred+33 quality string together with the
/// left/right trim offsets that define its active sub-range, and a discard
/// flag. Reverse-complement views are derived on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    /// Sequence identifier (without '@' prefix)
    pub id: String,
    /// DNA sequence
    pub sequence: Vec<u8>,
    /// Quality scores (Phred+33)
    pub quality: Vec<u8>,
    left_trim: usize,
    right_trim: usize,
    discard: bool,
}

impl Read {
    /// Create a new untrimmed, non-discarded read
    pub fn new(id: String, sequence: Vec<u8>, quality: Vec<u8>) -> Self {
        Self {
            id,
            sequence,
            quality,
            left_trim: 0,
            right_trim: 0,
            discard: false,
        }
    }

    /// Raw sequence
    #[inline]
    pub fn seq(&self) -> &[u8] {
        &self.sequence
    }

    /// Raw quality string
    #[inline]
    pub fn qual(&self) -> &[u8] {
        &self.quality
    }

    /// Reverse complement of the raw sequence
    ///
    /// # Examples
    ///
    /// ```
    /// use overlapper::Read;
    ///
    /// let read = Read::new("r".to_string(), b"AACG".to_vec(), b"ABCD".to_vec());
    /// assert_eq!(read.seq_rc(), b"CGTT");
    /// assert_eq!(read.qual_rc(), b"DCBA");
    /// ```
    pub fn seq_rc(&self) -> Vec<u8> {
        reverse_complement(&self.sequence)
    }

    /// Reversed quality string, aligned with [`Read::seq_rc`]
    pub fn qual_rc(&self) -> Vec<u8> {
        self.quality.iter().rev().copied().collect()
    }

    /// Raw length, ignoring trims
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` if the raw sequence is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Length of the active sub-range (raw length minus both trims)
    ///
    /// # Examples
    ///
    /// ```
    /// use overlapper::Read;
    ///
    /// let mut read = Read::new("r".to_string(), b"ACGTACGT".to_vec(), b"IIIIIIII".to_vec());
    /// read.set_left_trim(2);
    /// read.set_right_trim(1);
    /// assert_eq!(read.true_len(), 5);
    /// assert_eq!(read.sub_seq(), b"GTACG");
    /// ```
    pub fn true_len(&self) -> usize {
        self.len()
            .saturating_sub(self.left_trim)
            .saturating_sub(self.right_trim)
    }

    /// Bases trimmed from the 5' end
    pub fn left_trim(&self) -> usize {
        self.left_trim
    }

    /// Bases trimmed from the 3' end
    pub fn right_trim(&self) -> usize {
        self.right_trim
    }

    /// Set the number of bases trimmed from the 5' end
    pub fn set_left_trim(&mut self, bases: usize) {
        self.left_trim = bases;
    }

    /// Set the number of bases trimmed from the 3' end
    pub fn set_right_trim(&mut self, bases: usize) {
        self.right_trim = bases;
    }

    /// Active (trim-adjusted) sequence
    pub fn sub_seq(&self) -> &[u8] {
        let (start, end) = self.active_range();
        &self.sequence[start..end]
    }

    /// Active (trim-adjusted) quality string
    pub fn sub_qual(&self) -> &[u8] {
        let (start, end) = self.active_range();
        &self.quality[start..end]
    }

    fn active_range(&self) -> (usize, usize) {
        let start = self.left_trim.min(self.len());
        let end = self.len().saturating_sub(self.right_trim).max(start);
        (start, end)
    }

    /// Whether this read has been marked for discard
    pub fn discard(&self) -> bool {
        self.discard
    }

    /// Mark or unmark this read for discard
    pub fn set_discard(&mut self, discard: bool) {
        self.discard = discard;
    }

    /// Mark the read for discard if its active length is below `min_length`
    ///
    /// Returns the resulting discard flag. A read that is already discarded
    /// stays discarded.
    pub fn check_discarded(&mut self, min_length: usize) -> bool {
        if self.true_len() < min_length {
            self.discard = true;
        }
        self.discard
    }
}

/// Two reads sequenced from opposite ends of the same fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPair {
    /// Read 1 (forward)
    pub r1: Read,
    /// Read 2 (reverse)
    pub r2: Read,
}

impl ReadPair {
    /// Create a new pair
    pub fn new(r1: Read, r2: Read) -> Self {
        Self { r1, r2 }
    }
}

/// One unit pulled from a record stream
///
/// Only the two valid record shapes are representable; anything else is
/// rejected where records are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A paired-end fragment
    Paired(ReadPair),
    /// A single-end read
    Single(Read),
}
