//! Command-line interface for the `overlapper` binary

use crate::config::{
    OverlapConfig, DEFAULT_CHECK_LENGTHS, DEFAULT_KMER, DEFAULT_KMER_OFFSET,
    DEFAULT_MIN_LENGTH, DEFAULT_MIN_OVERLAP, DEFAULT_MISMATCH_DENSITY,
};
use crate::io::{FastqSink, InputFiles, TabSink};
use crate::overlapper::Overlapper;
use crate::stats::OverlapStats;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Name used for the run's key in the stats report
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

/// Merge overlapping paired-end reads into single consensus reads.
#[derive(Debug, Parser)]
#[command(
    name = "overlapper",
    version,
    long_about = r#"
Merge overlapping paired-end reads into single consensus reads.

When a fragment is shorter than the combined length of its two reads, the
reads overlap. Overlapping pairs are collapsed into one read with boosted
qualities where the reads agree. Pairs whose reads run past the fragment into
adapter (short inserts) lose the adapter in the process. Pairs without an
overlap, and single-end reads, are written unchanged.

Example usage:
  overlapper -1 sample_R1.fq.gz -2 sample_R2.fq.gz -p out/sample_ -g
  overlapper -T reads.tab6 -O -l 30 > merged.tab6
"#
)]
pub struct Args {
    /// Read 1 FASTQ input(s), paired positionally with --read2-input
    #[arg(short = '1', long = "read1-input", num_args = 1..)]
    pub read1_input: Vec<PathBuf>,

    /// Read 2 FASTQ input(s)
    #[arg(short = '2', long = "read2-input", num_args = 1..)]
    pub read2_input: Vec<PathBuf>,

    /// Single-end FASTQ input(s)
    #[arg(short = 'U', long = "singleend-input", num_args = 1..)]
    pub singleend_input: Vec<PathBuf>,

    /// Interleaved paired-end FASTQ input(s)
    #[arg(short = 'I', long = "interleaved-input", num_args = 1..)]
    pub interleaved_input: Vec<PathBuf>,

    /// Tab-delimited input(s)
    #[arg(short = 'T', long = "tab-input", num_args = 1..)]
    pub tab_input: Vec<PathBuf>,

    /// Read tab-delimited records from standard input
    #[arg(short = 'S', long = "stdin-input")]
    pub stdin_input: bool,

    /// Prefix for output files
    #[arg(short = 'p', long = "prefix", default_value = "overlapped_")]
    pub prefix: String,

    /// Gzip compress output files
    #[arg(short = 'g', long = "gzip-output")]
    pub gzip_output: bool,

    /// Write FASTQ output (the default)
    #[arg(short = 'f', long = "fastq-output", conflicts_with_all = ["tab_output", "to_stdout"])]
    pub fastq_output: bool,

    /// Write tab-delimited output to <prefix>.tab6
    #[arg(short = 't', long = "tab-output")]
    pub tab_output: bool,

    /// Write tab-delimited output to standard output
    #[arg(short = 'O', long = "to-stdout", conflicts_with = "tab_output")]
    pub to_stdout: bool,

    /// Overwrite existing output files
    #[arg(short = 'F', long = "force")]
    pub force: bool,

    /// Stats report file
    #[arg(short = 'L', long = "stats-file", default_value = "stats.log")]
    pub stats_file: PathBuf,

    /// Add this run to an existing stats report instead of replacing it
    #[arg(short = 'A', long = "append-stats-file")]
    pub append_stats_file: bool,

    /// Free-text notes stored in the stats report
    #[arg(short = 'N', long = "notes", default_value = "")]
    pub notes: String,

    /// Fraction of the overlap allowed to mismatch
    #[arg(short = 'x', long = "max-mismatch-density", default_value_t = DEFAULT_MISMATCH_DENSITY)]
    pub max_mismatch_density: f64,

    /// Overlaps must be longer than this many bases
    #[arg(short = 'o', long = "min-overlap", default_value_t = DEFAULT_MIN_OVERLAP)]
    pub min_overlap: usize,

    /// Minimum length of a merged read
    #[arg(short = 'l', long = "min-length", default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    /// K-mer length used to find candidate overlaps
    #[arg(short = 'k', long = "kmer", default_value_t = DEFAULT_KMER)]
    pub kmer: usize,

    /// K-mer sampling stride over the longer read
    #[arg(short = 'r', long = "kmer-offset", default_value_t = DEFAULT_KMER_OFFSET)]
    pub kmer_offset: usize,

    /// Positions probed at each end of the shorter read
    #[arg(short = 'c', long = "check-lengths", default_value_t = DEFAULT_CHECK_LENGTHS)]
    pub check_lengths: usize,

    /// Reverse complement orphaned R2 reads on output
    #[arg(short = 's', long = "stranded")]
    pub stranded: bool,

    /// Drop orphaned reads instead of writing them as single-end
    #[arg(short = 'n', long = "no-orphans")]
    pub no_orphans: bool,
}

impl Args {
    /// Overlap parameters selected on the command line
    pub fn overlap_config(&self) -> OverlapConfig {
        OverlapConfig {
            mismatch_density: self.max_mismatch_density,
            min_overlap: self.min_overlap,
            min_length: self.min_length,
            kmer: self.kmer,
            kmer_offset: self.kmer_offset,
            check_lengths: self.check_lengths,
            stranded: self.stranded,
            no_orphans: self.no_orphans,
        }
    }

    /// Inputs selected on the command line; standard input when none are given
    pub fn input_files(&self) -> InputFiles {
        let mut inputs = InputFiles {
            read1: self.read1_input.clone(),
            read2: self.read2_input.clone(),
            single_end: self.singleend_input.clone(),
            interleaved: self.interleaved_input.clone(),
            tab: self.tab_input.clone(),
            stdin: self.stdin_input,
        };
        if inputs.is_empty() {
            inputs.stdin = true;
        }
        inputs
    }

    /// Run the overlapper and write the stats report
    pub fn execute(&self) -> Result<()> {
        let overlapper = Overlapper::new(self.overlap_config())?;
        let inputs = self.input_files();
        let records = inputs.open()?;
        let mut stats = OverlapStats::new();

        info!("Starting {}", PROGRAM_NAME);
        if self.to_stdout {
            info!("Output: tab-delimited to stdout");
            let mut sink = TabSink::stdout()?;
            overlapper.run(records, &mut sink, &mut stats)?;
            sink.close()?;
        } else if self.tab_output {
            info!("Output: {}.tab6", self.prefix);
            let mut sink = TabSink::from_prefix(&self.prefix, self.gzip_output, self.force)?;
            overlapper.run(records, &mut sink, &mut stats)?;
            sink.close()?;
        } else {
            info!("Output: {}{{R1,R2,SE}}.fastq", self.prefix);
            let mut sink = FastqSink::from_prefix(&self.prefix, self.gzip_output, self.force)?;
            overlapper.run(records, &mut sink, &mut stats)?;
            sink.close()?;
        }

        stats.log_summary();
        stats
            .write_report(
                &self.stats_file,
                PROGRAM_NAME,
                &self.notes,
                self.append_stats_file,
            )
            .with_context(|| format!("writing stats report {}", self.stats_file.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["overlapper"]).unwrap();
        assert_eq!(args.overlap_config(), OverlapConfig::default());
        assert_eq!(args.prefix, "overlapped_");
        assert_eq!(args.stats_file, PathBuf::from("stats.log"));
        assert!(args.input_files().stdin);
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "overlapper", "-1", "a_R1.fq", "b_R1.fq", "-2", "a_R2.fq", "b_R2.fq", "-x", "0.1",
            "-o", "5", "-l", "30", "-k", "6", "-r", "2", "-c", "10", "-s", "-n", "-t",
        ])
        .unwrap();

        let config = args.overlap_config();
        assert_eq!(config.mismatch_density, 0.1);
        assert_eq!(config.min_overlap, 5);
        assert_eq!(config.min_length, 30);
        assert_eq!(config.kmer, 6);
        assert_eq!(config.kmer_offset, 2);
        assert_eq!(config.check_lengths, 10);
        assert!(config.stranded && config.no_orphans);
        assert!(args.tab_output);

        let inputs = args.input_files();
        assert_eq!(inputs.read1.len(), 2);
        assert!(!inputs.stdin);
    }

    #[test]
    fn test_conflicting_outputs() {
        assert!(Args::try_parse_from(["overlapper", "-f", "-t"]).is_err());
        assert!(Args::try_parse_from(["overlapper", "-t", "-O"]).is_err());
    }
}
