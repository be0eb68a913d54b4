//! Sequence operations and the overlap engine
//!
//! # Organization
//!
//! - `sequence`: reverse complement
//! - `kmer`: per-read k-mer offset index
//! - `overlap`: candidate search, verification and consensus merge

pub mod kmer;
pub mod overlap;
pub mod sequence;

pub use kmer::KmerIndex;
pub use overlap::{locate, verify};
pub use sequence::{complement_base, reverse_complement};
