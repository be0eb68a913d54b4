//! Reverse complement of read bases
//!
//! Reads are drawn from the alphabet `{A, C, G, T, N}`. The complement of any
//! byte outside `A/C/G/T` (either case) is `N`, so a reverse complement is
//! always a valid read sequence again.
//!
//! # Examples
//!
//! ```
//! use overlapper::operations::{complement_base, reverse_complement};
//!
//! assert_eq!(reverse_complement(b"ATGC"), b"GCAT");
//! assert_eq!(complement_base(b'A'), b'T');
//! assert_eq!(reverse_complement(b"ACGR"), b"NCGT");
//! ```

/// Lookup table for Watson-Crick complement
///
/// A↔T and C↔G (case preserved); every other byte maps to `N`.
const COMPLEMENT_TABLE: [u8; 256] = {
    let mut table = [b'N'; 256];

    table[b'A' as usize] = b'T';
    table[b'T' as usize] = b'A';
    table[b'G' as usize] = b'C';
    table[b'C' as usize] = b'G';
    table[b'a' as usize] = b't';
    table[b't' as usize] = b'a';
    table[b'g' as usize] = b'c';
    table[b'c' as usize] = b'g';

    table
};

/// Complement a single base
#[inline]
pub fn complement_base(base: u8) -> u8 {
    COMPLEMENT_TABLE[base as usize]
}

/// Reverse complement a DNA sequence
///
/// # Examples
///
/// ```
/// use overlapper::operations::reverse_complement;
///
/// let rc = reverse_complement(b"ACGTN");
/// assert_eq!(rc, b"NACGT");
///
/// // Involutive on the read alphabet
/// assert_eq!(reverse_complement(&rc), b"ACGTN");
/// ```
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&base| complement_base(base)).collect()
}
