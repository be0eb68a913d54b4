//! Ungapped end-to-end overlap detection and consensus merging
//!
//! When a fragment is shorter than the combined read length, the 3' end of
//! one read runs into the reverse complement of its mate. Both reads then
//! describe the same bases, and the pair can be collapsed into a single
//! consensus read:
//!
//! ```text
//! long read      ACGTACGTAC
//! short read RC      ACGTAC
//! consensus      ACGTACGTAC   (overlap qualities boosted)
//! ```
//!
//! [`locate`] finds candidate alignment anchors by probing k-mers at the two
//! edges of the short read's reverse complement against a [`KmerIndex`] of
//! the long read. [`verify`] checks one anchor with a mismatch budget and, on
//! success, builds the consensus.
//!
//! # Consensus qualities (Phred+33)
//!
//! - Agreeing bases: `q1 + q2 - 33`, capped at `I` (Phred 40)
//! - Disagreeing bases: the base with the higher quality wins, quality
//!   `q1 - q2 + 33`, floored at `"` (Phred 1)
//!
//! Overlap qualities always lie in `[34, 73]`. Bases outside the overlap keep
//! their input qualities.
//!
//! Gapped or indel-aware alignment is out of scope: only ungapped overlaps
//! are detected.

use crate::config::OverlapConfig;
use crate::operations::kmer::KmerIndex;
use crate::types::Read;
use log::trace;

/// Phred+33 encoding offset
pub const PHRED_OFFSET: i32 = 33;
/// Highest quality emitted for an overlapped base (`I`, Phred 40)
pub const MAX_CONSENSUS_QUALITY: u8 = b'I';
/// Lowest quality emitted for an overlapped base (`"`, Phred 1)
pub const MIN_CONSENSUS_QUALITY: u8 = b'"';

/// Quality of an overlapped position where both reads agree
#[inline]
fn agreeing_quality(q1: u8, q2: u8) -> u8 {
    clamp_quality(q1 as i32 + q2 as i32 - PHRED_OFFSET)
}

/// Quality of an overlapped position where the reads disagree
#[inline]
fn disagreeing_quality(q1: u8, q2: u8) -> u8 {
    clamp_quality(q1 as i32 - q2 as i32 + PHRED_OFFSET)
}

#[inline]
fn clamp_quality(q: i32) -> u8 {
    q.clamp(MIN_CONSENSUS_QUALITY as i32, MAX_CONSENSUS_QUALITY as i32) as u8
}

/// Verify a candidate overlap and build its consensus read
///
/// `read2_rc` must already be reverse complemented (sequence and quality).
/// `offset1` and `offset2` name the same fragment position in each read; the
/// comparison window starts at the leftmost anchor and runs until either
/// read ends.
///
/// Returns `None` when the window is not strictly longer than `min_overlap`,
/// or as soon as the mismatch count exceeds
/// `floor(window * mismatch_density)`. The consensus takes its identifier
/// from `read1`.
///
/// # Examples
///
/// ```
/// use overlapper::Read;
/// use overlapper::operations::overlap::verify;
///
/// let read1 = Read::new("frag".to_string(), b"ACGTACGTAC".to_vec(), b"IIIIIIIIII".to_vec());
/// let read2_rc = Read::new("mate".to_string(), b"ACGTAC".to_vec(), b"IIIIII".to_vec());
///
/// let merged = verify(&read1, &read2_rc, 4, 0, 0.2, 3).unwrap();
/// assert_eq!(merged.sequence, b"ACGTACGTAC");
/// assert_eq!(merged.id, "frag");
///
/// // Window of 6 is not longer than a minimum overlap of 6
/// assert!(verify(&read1, &read2_rc, 4, 0, 0.2, 6).is_none());
/// ```
pub fn verify(
    read1: &Read,
    read2_rc: &Read,
    offset1: usize,
    offset2: usize,
    mismatch_density: f64,
    min_overlap: usize,
) -> Option<Read> {
    let base = offset1.min(offset2);
    let t1 = offset1 - base;
    let t2 = offset2 - base;

    let (seq1, qual1) = (read1.seq(), read1.qual());
    let (seq2, qual2) = (read2_rc.seq(), read2_rc.qual());

    if t1 > seq1.len() || t2 > seq2.len() {
        return None;
    }

    let window = (seq1.len() - t1).min(seq2.len() - t2);
    if window <= min_overlap {
        return None;
    }
    let max_mismatches = (window as f64 * mismatch_density).floor() as usize;

    let mut sequence = Vec::with_capacity(seq1.len() + seq2.len());
    let mut quality = Vec::with_capacity(seq1.len() + seq2.len());

    // Only the leftmost read can contribute a prefix
    if t1 >= t2 {
        sequence.extend_from_slice(&seq1[..t1]);
        quality.extend_from_slice(&qual1[..t1]);
    }

    let mut mismatches = 0usize;
    for i in 0..window {
        let (b1, q1) = (seq1[t1 + i], qual1[t1 + i]);
        let (b2, q2) = (seq2[t2 + i], qual2[t2 + i]);

        if b1 == b2 {
            sequence.push(b1);
            quality.push(agreeing_quality(q1, q2));
        } else {
            mismatches += 1;
            if mismatches > max_mismatches {
                return None;
            }
            sequence.push(if q1 > q2 { b1 } else { b2 });
            quality.push(disagreeing_quality(q1, q2));
        }
    }

    if seq1.len() - t1 < seq2.len() - t2 {
        sequence.extend_from_slice(&seq2[t2 + window..]);
        quality.extend_from_slice(&qual2[t2 + window..]);
    }

    trace!(
        "{}: overlap verified at ({}, {}), window {}, {} mismatches",
        read1.id,
        offset1,
        offset2,
        window,
        mismatches
    );

    Some(Read::new(read1.id.clone(), sequence, quality))
}

/// Search for an overlap between `long` and `short_rc`
///
/// `index` must be built over `long`'s forward sequence and `short_rc` must
/// be the reverse-complemented shorter read. Only edge positions of
/// `short_rc` are probed:
///
/// 1. Leading edge: positions `0 .. check_lengths`
/// 2. Trailing edge: the `check_lengths` positions before the final k-mer
///    window
///
/// For each probe, every index hit is verified in insertion order. The first
/// verified candidate wins; no attempt is made to find the best or longest
/// overlap.
pub fn locate(
    long: &Read,
    short_rc: &Read,
    index: &KmerIndex<'_>,
    config: &OverlapConfig,
) -> Option<Read> {
    let k = config.kmer;
    let seq = short_rc.seq();

    if index.is_empty() || k == 0 || seq.len() < k {
        return None;
    }

    let last_window = seq.len() - k;
    let leading = 0..config.check_lengths.min(last_window + 1);
    let trailing = last_window.saturating_sub(config.check_lengths)..last_window;

    leading.chain(trailing).find_map(|probe| {
        index
            .lookup(&seq[probe..probe + k])
            .iter()
            .find_map(|&offset| {
                verify(
                    long,
                    short_rc,
                    offset,
                    probe,
                    config.mismatch_density,
                    config.min_overlap,
                )
            })
    })
}
