//! Record-level orchestration of overlap merging
//!
//! For each record pulled from the input:
//!
//! - Single-end reads pass through untouched.
//! - Paired reads are ordered longer-first, the longer read is indexed, and
//!   the shorter read's reverse complement is probed against it. A verified
//!   overlap whose consensus is at least `min_length` long replaces the pair
//!   with one merged read; anything else leaves the original pair as is.
//!
//! Statistics are updated once per record, after it has been written.

use crate::config::OverlapConfig;
use crate::error::Result;
use crate::io::{write_record, ReadSink};
use crate::operations::{locate, KmerIndex};
use crate::stats::OverlapStats;
use crate::types::{Read, ReadPair, Record};
use log::{debug, trace, warn};

/// How a paired record was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertClassification {
    /// Merged; both reads lie within the fragment (no adapter read-through)
    LongInsert(usize),
    /// Merged; at least one read extends past the fragment into adapter
    ShortInsert(usize),
    /// No accepted overlap
    NoOverlap,
}

impl InsertClassification {
    /// Insert size of a merged fragment
    pub fn insert_size(&self) -> Option<usize> {
        match *self {
            Self::LongInsert(size) | Self::ShortInsert(size) => Some(size),
            Self::NoOverlap => None,
        }
    }
}

/// Result of resolving one paired record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    /// Long/short insert or no overlap
    pub classification: InsertClassification,
    /// The merged read, present exactly when the pair was merged
    pub consensus: Option<Read>,
}

/// Order a pair longer-first
///
/// Returns `(longer, shorter, swapped)`; `swapped` is `true` when R2 is
/// strictly longer than R1. Ties keep R1 first.
pub fn normalize_pair(pair: &ReadPair) -> (&Read, &Read, bool) {
    if pair.r1.len() < pair.r2.len() {
        (&pair.r2, &pair.r1, true)
    } else {
        (&pair.r1, &pair.r2, false)
    }
}

/// Search `pair` for an overlap and return the merged read
///
/// A consensus shorter than `min_length` counts as no overlap.
pub fn check_pair(pair: &ReadPair, config: &OverlapConfig) -> Option<Read> {
    let (long, short, _) = normalize_pair(pair);

    let index = KmerIndex::build(long.seq(), config.kmer, config.kmer_offset);
    if index.is_empty() {
        return None;
    }

    let short_rc = Read::new(short.id.clone(), short.seq_rc(), short.qual_rc());
    let consensus = locate(long, &short_rc, &index, config)?;

    if consensus.len() < config.min_length {
        trace!(
            "{}: consensus of {} bases is below minimum length {}",
            pair.r1.id,
            consensus.len(),
            config.min_length
        );
        return None;
    }
    Some(consensus)
}

/// Classify a pair given its merged read, if any
///
/// A merge is a short insert when either original read is longer (by true
/// length) than the merged fragment.
pub fn classify(pair: &ReadPair, consensus: Option<&Read>) -> InsertClassification {
    match consensus {
        None => InsertClassification::NoOverlap,
        Some(merged) => {
            let insert = merged.true_len();
            if pair.r1.true_len() > insert || pair.r2.true_len() > insert {
                InsertClassification::ShortInsert(insert)
            } else {
                InsertClassification::LongInsert(insert)
            }
        }
    }
}

/// Resolve a pair: merge, apply the length check to the merged read, and
/// classify
pub fn resolve_pair(pair: &ReadPair, config: &OverlapConfig) -> PairOutcome {
    let consensus = check_pair(pair, config).map(|mut merged| {
        merged.check_discarded(config.min_length);
        merged
    });
    let classification = classify(pair, consensus.as_ref());
    trace!("{}: {:?}", pair.r1.id, classification);
    PairOutcome {
        classification,
        consensus,
    }
}

/// Drives a record stream through overlap resolution into a sink
///
/// # Example
///
/// ```
/// use overlapper::io::FastqSink;
/// use overlapper::{OverlapConfig, OverlapStats, Overlapper, Read, Record};
///
/// # fn main() -> overlapper::Result<()> {
/// let overlapper = Overlapper::new(OverlapConfig::default())?;
/// let mut sink = FastqSink::new(Vec::new(), Vec::new(), Vec::new());
/// let mut stats = OverlapStats::new();
///
/// let read = Read::new("se".to_string(), b"ACGT".to_vec(), b"IIII".to_vec());
/// overlapper.run(vec![Ok(Record::Single(read))], &mut sink, &mut stats)?;
///
/// assert_eq!(stats.se_out, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Overlapper {
    config: OverlapConfig,
}

impl Overlapper {
    /// Create an orchestrator, validating `config`
    pub fn new(config: OverlapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &OverlapConfig {
        &self.config
    }

    /// Resolve, write and count one record
    pub fn process_record<S: ReadSink + ?Sized>(
        &self,
        record: &Record,
        sink: &mut S,
        stats: &mut OverlapStats,
    ) -> Result<()> {
        match record {
            Record::Paired(pair) => {
                let outcome = resolve_pair(pair, &self.config);
                match &outcome.consensus {
                    Some(merged) => {
                        if !merged.discard() {
                            sink.write_single(merged, false)?;
                        }
                    }
                    None => write_record(
                        sink,
                        record,
                        self.config.stranded,
                        self.config.no_orphans,
                    )?,
                }
                stats.record_pair(pair, &outcome);
            }
            Record::Single(read) => {
                write_record(sink, record, self.config.stranded, self.config.no_orphans)?;
                stats.record_single(read);
            }
        }
        Ok(())
    }

    /// Process every record of `records`
    ///
    /// Stops at the first error, either from the stream (such as an
    /// unrecognized record) or from the sink.
    pub fn run<I, S>(&self, records: I, sink: &mut S, stats: &mut OverlapStats) -> Result<()>
    where
        I: IntoIterator<Item = Result<Record>>,
        S: ReadSink + ?Sized,
    {
        debug!("overlap configuration: {:?}", self.config);
        let mut processed = 0u64;
        for record in records {
            self.process_record(&record?, sink, stats)?;
            processed += 1;
        }
        sink.flush()?;

        if processed == 0 {
            warn!("no records were read from the input");
        } else {
            debug!("processed {} records", processed);
        }
        Ok(())
    }
}
