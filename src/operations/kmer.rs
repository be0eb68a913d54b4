//! K-mer offset index over a single read
//!
//! The overlap search needs one question answered quickly: "where in the
//! longer read does this k-mer of the partner occur?". [`KmerIndex`] maps each
//! sampled k-mer of a read to every offset it was sampled at.
//!
//! # Sampling
//!
//! Windows of length `k` are taken at offsets `0, stride, 2*stride, ...` while
//! they fit. If the last sampled window is not flush with the end of the read,
//! one extra window anchored at `len - k` is added, so the final `k` bases are
//! always indexed regardless of stride.
//!
//! Keys borrow from the indexed sequence; an index lives only as long as the
//! read it was built over.
//!
//! # Examples
//!
//! ```
//! use overlapper::operations::kmer::KmerIndex;
//!
//! let index = KmerIndex::build(b"ACGTACGTAC", 4, 2);
//! // offsets 0, 2, 4, 6 and the forced tail window at 6 (already flush)
//! assert_eq!(index.lookup(b"ACGT"), &[0, 4]);
//! assert_eq!(index.lookup(b"GTAC"), &[2, 6]);
//! assert!(index.lookup(b"TTTT").is_empty());
//! ```

use std::collections::HashMap;

/// Multi-valued map from k-mer to offsets in the source read
///
/// Duplicate k-mers keep every offset, in insertion (ascending) order. That
/// order is the tie-break order used by the overlap locator.
#[derive(Debug, Clone, Default)]
pub struct KmerIndex<'a> {
    offsets: HashMap<&'a [u8], Vec<usize>>,
    entries: usize,
}

impl<'a> KmerIndex<'a> {
    /// Build an index over `sequence` with k-mer length `k`, sampling every
    /// `stride` bases
    ///
    /// Returns an empty index (not an error) when `sequence` is shorter than
    /// `k` or `k` is zero. A `stride` of zero is treated as one.
    ///
    /// # Performance
    ///
    /// - Time: O(len / stride) insertions
    /// - Lookup: O(1) amortized per key
    pub fn build(sequence: &'a [u8], k: usize, stride: usize) -> Self {
        let mut index = Self {
            offsets: HashMap::new(),
            entries: 0,
        };

        if k == 0 || sequence.len() < k {
            return index;
        }

        let last = sequence.len() - k;
        let stride = stride.max(1);

        let mut offset = 0;
        let mut previous = 0;
        while offset <= last {
            index.insert(&sequence[offset..offset + k], offset);
            previous = offset;
            offset += stride;
        }

        // Tail coverage: the last k bases are always indexed
        if previous != last {
            index.insert(&sequence[last..], last);
        }

        index
    }

    fn insert(&mut self, kmer: &'a [u8], offset: usize) {
        self.offsets.entry(kmer).or_default().push(offset);
        self.entries += 1;
    }

    /// All offsets at which `kmer` was sampled, in insertion order
    pub fn lookup(&self, kmer: &[u8]) -> &[usize] {
        self.offsets.get(kmer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of (k-mer, offset) entries
    pub fn len(&self) -> usize {
        self.entries
    }

    /// Returns `true` if no k-mer was indexed
    ///
    /// Callers treat an empty index as "no overlap possible".
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Every `(k-mer, offset)` entry; order across keys is unspecified
    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = (&'a [u8], usize)> + '_ {
        self.offsets
            .iter()
            .flat_map(|(kmer, offsets)| offsets.iter().map(move |&offset| (*kmer, offset)))
    }
}
