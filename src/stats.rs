//! Run statistics and the JSON stats report
//!
//! [`OverlapStats`] is the single accumulator of a run. It is updated once
//! per record, after that record's outcome is fully known, so a partially
//! processed record is never visible in the counters.

use crate::error::Result;
use crate::overlapper::{InsertClassification, PairOutcome};
use crate::types::{Read, ReadPair};
use log::info;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Counters and insert-length histogram for one run
///
/// Field names in the report follow the established stats-log keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverlapStats {
    /// Fragments read (pairs and single reads)
    #[serde(rename = "TotalFragmentsInput")]
    pub total_fragments_input: u64,
    /// Paired records read
    #[serde(rename = "PE_In")]
    pub pe_in: u64,
    /// Single-end records read
    #[serde(rename = "SE_In")]
    pub se_in: u64,
    /// Fragments with at least one read written
    #[serde(rename = "TotalFragmentsOutput")]
    pub total_fragments_output: u64,
    /// Pairs written unmerged
    #[serde(rename = "PE_Out")]
    pub pe_out: u64,
    /// Single reads written, including merged reads
    #[serde(rename = "SE_Out")]
    pub se_out: u64,
    /// Single or merged reads discarded
    #[serde(rename = "SE_Discard")]
    pub se_discard: u64,
    /// Unmerged R1 reads discarded
    #[serde(rename = "R1_Discard")]
    pub r1_discard: u64,
    /// Unmerged R2 reads discarded
    #[serde(rename = "R2_Discard")]
    pub r2_discard: u64,
    /// Long-insert merges
    #[serde(rename = "lins")]
    pub lins: u64,
    /// Short-insert merges
    #[serde(rename = "sins")]
    pub sins: u64,
    /// Pairs without an accepted overlap
    #[serde(rename = "Nolins")]
    pub nolins: u64,
    /// Bases of R1 read past the fragment end, summed over merges
    ///
    /// The established stats-log counter of this name sums the reads'
    /// left-trim offsets, which are always 0 for untrimmed input. This one
    /// counts the adapter overhang instead.
    #[serde(rename = "R1_Adapter_Trim")]
    pub r1_adapter_trim: u64,
    /// Bases of R2 read past the fragment end, summed over merges
    ///
    /// Same overhang measure as `r1_adapter_trim`.
    #[serde(rename = "R2_Adapter_Trim")]
    pub r2_adapter_trim: u64,
    /// Total length of merged reads
    #[serde(rename = "SE_Length")]
    pub se_length: u64,
    /// Number of merges per insert size (index = insert size)
    ///
    /// Reported as one `"<size>": count` key per size from 1 upward.
    #[serde(skip)]
    pub insert_length: Vec<u64>,
}

impl OverlapStats {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a single-end record that has been dispatched
    pub fn record_single(&mut self, read: &Read) {
        self.total_fragments_input += 1;
        self.se_in += 1;
        if read.discard() {
            self.se_discard += 1;
        } else {
            self.se_out += 1;
            self.total_fragments_output += 1;
        }
    }

    /// Account for a paired record and the outcome of its overlap check
    ///
    /// `pair` is the record as read, in its original R1/R2 order.
    pub fn record_pair(&mut self, pair: &ReadPair, outcome: &PairOutcome) {
        self.total_fragments_input += 1;
        self.pe_in += 1;

        match outcome.classification {
            InsertClassification::ShortInsert(insert) => {
                self.sins += 1;
                self.add_insert(insert);
            }
            InsertClassification::LongInsert(insert) => {
                self.lins += 1;
                self.add_insert(insert);
            }
            InsertClassification::NoOverlap => self.nolins += 1,
        }

        match &outcome.consensus {
            Some(consensus) => {
                if consensus.discard() {
                    self.se_discard += 1;
                } else {
                    self.se_out += 1;
                    self.total_fragments_output += 1;
                }
                let insert = consensus.true_len();
                self.se_length += insert as u64;
                self.r1_adapter_trim += pair.r1.true_len().saturating_sub(insert) as u64;
                self.r2_adapter_trim += pair.r2.true_len().saturating_sub(insert) as u64;
            }
            None => {
                match (pair.r1.discard(), pair.r2.discard()) {
                    (false, false) => self.pe_out += 1,
                    (true, true) => {
                        self.r1_discard += 1;
                        self.r2_discard += 1;
                    }
                    (true, false) => self.r1_discard += 1,
                    (false, true) => self.r2_discard += 1,
                }
                if !(pair.r1.discard() && pair.r2.discard()) {
                    self.total_fragments_output += 1;
                }
            }
        }
    }

    fn add_insert(&mut self, insert: usize) {
        if insert >= self.insert_length.len() {
            self.insert_length.resize(insert + 1, 0);
        }
        self.insert_length[insert] += 1;
    }

    fn insert_length_fields(&self) -> impl Iterator<Item = (String, Value)> + '_ {
        self.insert_length
            .iter()
            .enumerate()
            .skip(1)
            .map(|(size, &count)| (size.to_string(), Value::from(count)))
    }

    /// Log a one-line summary of the run
    pub fn log_summary(&self) {
        info!(
            "fragments in: {} (PE {}, SE {}), out: {}; merged {} (lins {}, sins {}), not merged {}",
            self.total_fragments_input,
            self.pe_in,
            self.se_in,
            self.total_fragments_output,
            self.lins + self.sins,
            self.lins,
            self.sins,
            self.nolins
        );
    }

    /// Write the stats report as JSON keyed by `"<program>_<pid>"`
    ///
    /// With `append`, an existing report holding a JSON object gains this run
    /// as another top-level key; otherwise the file is replaced.
    pub fn write_report<P: AsRef<Path>>(
        &self,
        path: P,
        program: &str,
        notes: &str,
        append: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut report = if append {
            read_existing_report(path)?
        } else {
            Map::new()
        };

        let mut run = Map::new();
        run.insert("Notes".to_string(), Value::String(notes.to_string()));
        if let Value::Object(fields) = serde_json::to_value(self)? {
            run.extend(fields);
        }
        run.extend(self.insert_length_fields());
        report.insert(
            format!("{}_{}", program, std::process::id()),
            Value::Object(run),
        );

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &Value::Object(report))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

fn read_existing_report(path: &Path) -> Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str(&content)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(seq: &[u8]) -> Read {
        Read::new("r".to_string(), seq.to_vec(), vec![b'I'; seq.len()])
    }

    fn pair(len1: usize, len2: usize) -> ReadPair {
        ReadPair::new(read(&vec![b'A'; len1]), read(&vec![b'C'; len2]))
    }

    fn merged(len: usize, classification: InsertClassification) -> PairOutcome {
        PairOutcome {
            classification,
            consensus: Some(read(&vec![b'G'; len])),
        }
    }

    #[test]
    fn test_short_insert_counts() {
        let mut stats = OverlapStats::new();
        stats.record_pair(&pair(24, 24), &merged(20, InsertClassification::ShortInsert(20)));

        assert_eq!(stats.sins, 1);
        assert_eq!(stats.lins, 0);
        assert_eq!(stats.insert_length.len(), 21);
        assert_eq!(stats.insert_length[20], 1);
        assert_eq!(stats.se_out, 1);
        assert_eq!(stats.se_length, 20);
        assert_eq!(stats.r1_adapter_trim, 4);
        assert_eq!(stats.r2_adapter_trim, 4);
        assert_eq!(stats.pe_in, 1);
        assert_eq!(stats.total_fragments_output, 1);
    }

    #[test]
    fn test_histogram_grows_and_keeps_counts() {
        let mut stats = OverlapStats::new();
        stats.record_pair(&pair(30, 28), &merged(35, InsertClassification::LongInsert(35)));
        stats.record_pair(&pair(30, 28), &merged(12, InsertClassification::ShortInsert(12)));
        stats.record_pair(&pair(30, 28), &merged(35, InsertClassification::LongInsert(35)));

        assert_eq!(stats.insert_length.len(), 36);
        assert_eq!(stats.insert_length[35], 2);
        assert_eq!(stats.insert_length[12], 1);
        assert_eq!(stats.r1_adapter_trim, 18);
    }

    #[test]
    fn test_unmerged_and_discards() {
        let mut stats = OverlapStats::new();
        let no_overlap = PairOutcome {
            classification: InsertClassification::NoOverlap,
            consensus: None,
        };
        stats.record_pair(&pair(10, 10), &no_overlap);

        let mut half = pair(10, 10);
        half.r2.set_discard(true);
        stats.record_pair(&half, &no_overlap);

        let mut discarded = read(b"ACGT");
        discarded.set_discard(true);
        stats.record_single(&discarded);
        stats.record_single(&read(b"ACGT"));

        assert_eq!(stats.nolins, 2);
        assert_eq!(stats.pe_out, 1);
        assert_eq!(stats.r2_discard, 1);
        assert_eq!(stats.r1_discard, 0);
        assert_eq!(stats.se_discard, 1);
        assert_eq!(stats.se_out, 1);
        assert_eq!(stats.total_fragments_input, 4);
        assert_eq!(stats.total_fragments_output, 3);
        assert!(stats.insert_length.is_empty());
    }

    #[test]
    fn test_write_report_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.log");

        let mut stats = OverlapStats::new();
        stats.record_single(&read(b"ACGT"));
        stats.write_report(&path, "overlapper", "first run", false).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let key = format!("overlapper_{}", std::process::id());
        assert_eq!(value[&key]["Notes"], "first run");
        assert_eq!(value[&key]["SE_In"], 1);
        assert!(value[&key].get("insertLength").is_none());
        assert!(value[&key].get("1").is_none());
    }

    #[test]
    fn test_report_flattens_insert_histogram() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.log");

        let mut stats = OverlapStats::new();
        stats.record_pair(&pair(24, 24), &merged(3, InsertClassification::ShortInsert(3)));
        stats.record_pair(&pair(24, 24), &merged(3, InsertClassification::ShortInsert(3)));
        stats.write_report(&path, "overlapper", "", false).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let run = &value[format!("overlapper_{}", std::process::id())];
        assert_eq!(run["1"], 0);
        assert_eq!(run["2"], 0);
        assert_eq!(run["3"], 2);
        assert!(run.get("0").is_none());
        assert!(run.get("4").is_none());
    }

    #[test]
    fn test_append_report_adds_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.log");
        fs::write(&path, "{\"hts_Other_42\": {\"Notes\": \"\"}}\n").unwrap();

        OverlapStats::new()
            .write_report(&path, "overlapper", "", true)
            .unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("hts_Other_42"));

        // without append the file is replaced
        OverlapStats::new()
            .write_report(&path, "overlapper", "", false)
            .unwrap();
        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
    }
}
