//! Integration tests for complete read → overlap → write pipelines

use flate2::write::GzEncoder;
use flate2::Compression;
use overlapper::io::{FastqSink, InputFiles, TabSink};
use overlapper::operations::reverse_complement;
use overlapper::{OverlapConfig, OverlapStats, Overlapper, OverlapperError, Record, TabStream};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FRAGMENT_20: &str = "ACGGTCATGCTAGCTTACGA";
const FRAGMENT_35: &str = "ACGGTCATGCTAGCTTACGATCCGTAAGGCTTGCA";

fn rc(seq: &str) -> String {
    String::from_utf8(reverse_complement(seq.as_bytes())).unwrap()
}

fn fastq(id: &str, seq: &str) -> String {
    format!("@{}\n{}\n+\n{}\n", id, seq, "I".repeat(seq.len()))
}

fn write_gz(path: &Path, content: &str) {
    let mut encoder = GzEncoder::new(fs::File::create(path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn config() -> OverlapConfig {
    OverlapConfig {
        min_length: 10,
        ..OverlapConfig::default()
    }
}

/// Three pairs: a short insert, a long insert and a pair without overlap
fn write_paired_inputs(dir: &TempDir) -> (PathBuf, PathBuf) {
    let r1 = [
        fastq("sin/1", &format!("{}GGGG", FRAGMENT_20)),
        fastq("lin/1", &FRAGMENT_35[..30]),
        fastq("none/1", &"A".repeat(20)),
    ]
    .concat();
    let r2 = [
        fastq("sin/2", &format!("{}AAAA", rc(FRAGMENT_20))),
        fastq("lin/2", &rc(&FRAGMENT_35[7..])),
        fastq("none/2", &"A".repeat(20)),
    ]
    .concat();

    let r1_path = dir.path().join("in_R1.fq");
    let r2_path = dir.path().join("in_R2.fq.gz");
    fs::write(&r1_path, r1).unwrap();
    write_gz(&r2_path, &r2);
    (r1_path, r2_path)
}

#[test]
fn test_paired_fastq_pipeline() {
    let dir = TempDir::new().unwrap();
    let (r1_path, r2_path) = write_paired_inputs(&dir);
    let prefix = format!("{}/out_", dir.path().display());

    let inputs = InputFiles {
        read1: vec![r1_path],
        read2: vec![r2_path],
        ..InputFiles::default()
    };
    let overlapper = Overlapper::new(config()).unwrap();
    let mut sink = FastqSink::from_prefix(&prefix, false, false).unwrap();
    let mut stats = OverlapStats::new();

    overlapper
        .run(inputs.open().unwrap(), &mut sink, &mut stats)
        .unwrap();
    sink.close().unwrap();

    let se = fs::read_to_string(format!("{}SE.fastq", prefix)).unwrap();
    assert_eq!(se, [fastq("sin/1", FRAGMENT_20), fastq("lin/1", FRAGMENT_35)].concat());

    let r1 = fs::read_to_string(format!("{}R1.fastq", prefix)).unwrap();
    let r2 = fs::read_to_string(format!("{}R2.fastq", prefix)).unwrap();
    assert_eq!(r1, fastq("none/1", &"A".repeat(20)));
    assert_eq!(r2, fastq("none/2", &"A".repeat(20)));

    assert_eq!(stats.pe_in, 3);
    assert_eq!(stats.sins, 1);
    assert_eq!(stats.lins, 1);
    assert_eq!(stats.nolins, 1);
    assert_eq!(stats.se_out, 2);
    assert_eq!(stats.pe_out, 1);
    assert_eq!(stats.insert_length[20], 1);
    assert_eq!(stats.insert_length[35], 1);
    assert_eq!(stats.se_length, 55);
}

#[test]
fn test_gzip_output_and_stats_report() {
    let dir = TempDir::new().unwrap();
    let (r1_path, r2_path) = write_paired_inputs(&dir);
    let prefix = format!("{}/gz_", dir.path().display());
    let report = dir.path().join("stats.log");

    let inputs = InputFiles {
        read1: vec![r1_path],
        read2: vec![r2_path],
        ..InputFiles::default()
    };
    let overlapper = Overlapper::new(config()).unwrap();
    let mut sink = FastqSink::from_prefix(&prefix, true, false).unwrap();
    let mut stats = OverlapStats::new();
    overlapper
        .run(inputs.open().unwrap(), &mut sink, &mut stats)
        .unwrap();
    sink.close().unwrap();
    stats.write_report(&report, "overlapper", "gz run", false).unwrap();

    // merged reads read back through the gzip-detecting parser
    let merged: Vec<_> = overlapper::FastqStream::from_path(format!("{}SE.fastq.gz", prefix))
        .unwrap()
        .collect::<overlapper::Result<_>>()
        .unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[1].sequence, FRAGMENT_35.as_bytes());

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let run = &value[format!("overlapper_{}", std::process::id())];
    assert_eq!(run["Notes"], "gz run");
    assert_eq!(run["PE_In"], 3);
    assert_eq!(run["lins"], 1);
    assert_eq!(run["sins"], 1);
    assert_eq!(run["Nolins"], 1);
    assert_eq!(run["20"], 1);
    assert_eq!(run["35"], 1);
    assert_eq!(run["21"], 0);
}

#[test]
fn test_existing_output_refused_without_force() {
    let dir = TempDir::new().unwrap();
    let prefix = format!("{}/out_", dir.path().display());
    fs::write(format!("{}R2.fastq", prefix), "keep me").unwrap();

    let result = FastqSink::from_prefix(&prefix, false, false);
    assert!(matches!(result, Err(OverlapperError::OutputExists(_))));
    assert_eq!(fs::read_to_string(format!("{}R2.fastq", prefix)).unwrap(), "keep me");

    let sink = FastqSink::from_prefix(&prefix, false, true).unwrap();
    sink.close().unwrap();
    assert_eq!(fs::read_to_string(format!("{}R2.fastq", prefix)).unwrap(), "");
}

#[test]
fn test_mixed_inputs_to_tab_output() {
    let dir = TempDir::new().unwrap();
    let se_path = dir.path().join("se.fq");
    let il_path = dir.path().join("il.fq");
    let tab_path = dir.path().join("in.tab6");
    fs::write(&se_path, fastq("single", "ACGTN")).unwrap();
    fs::write(
        &il_path,
        [
            fastq("sin/1", &format!("{}GGGG", FRAGMENT_20)),
            fastq("sin/2", &format!("{}AAAA", rc(FRAGMENT_20))),
        ]
        .concat(),
    )
    .unwrap();
    fs::write(&tab_path, "p\tAAAAAAAAAA\tIIIIIIIIII\tAAAAAAAAAA\tIIIIIIIIII\n").unwrap();

    let inputs = InputFiles {
        single_end: vec![se_path],
        interleaved: vec![il_path],
        tab: vec![tab_path],
        ..InputFiles::default()
    };
    let overlapper = Overlapper::new(config()).unwrap();
    let mut sink = TabSink::new(Vec::new());
    let mut stats = OverlapStats::new();
    overlapper
        .run(inputs.open().unwrap(), &mut sink, &mut stats)
        .unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "single\tACGTN\tIIIII");
    assert_eq!(lines[1], format!("sin/1\t{}\t{}", FRAGMENT_20, "I".repeat(20)));
    assert_eq!(lines[2], "p\tAAAAAAAAAA\tIIIIIIIIII\tp\tAAAAAAAAAA\tIIIIIIIIII");

    assert_eq!(stats.total_fragments_input, 3);
    assert_eq!(stats.se_in, 1);
    assert_eq!(stats.pe_in, 2);

    // tab output parses back into the same record shapes
    let records: Vec<Record> = TabStream::from_reader(out.as_bytes())
        .collect::<overlapper::Result<_>>()
        .unwrap();
    assert!(matches!(records[2], Record::Paired(_)));
}

#[test]
fn test_unrecognized_tab_record_aborts_run() {
    let dir = TempDir::new().unwrap();
    let tab_path = dir.path().join("bad.tab");
    fs::write(&tab_path, "ok\tACGT\tIIII\nbroken\tACGT\tIIII\tx\n").unwrap();

    let inputs = InputFiles {
        tab: vec![tab_path],
        ..InputFiles::default()
    };
    let overlapper = Overlapper::new(config()).unwrap();
    let mut sink = TabSink::new(Vec::new());
    let mut stats = OverlapStats::new();

    let result = overlapper.run(inputs.open().unwrap(), &mut sink, &mut stats);
    assert!(matches!(
        result,
        Err(OverlapperError::UnrecognizedRecord { line: 2, fields: 4 })
    ));
    assert_eq!(stats.total_fragments_input, 1);
    assert_eq!(sink.into_inner(), b"ok\tACGT\tIIII\n");
}

#[test]
fn test_paired_count_mismatch_is_error() {
    let dir = TempDir::new().unwrap();
    let r1_path = dir.path().join("r1.fq");
    let r2_path = dir.path().join("r2.fq");
    fs::write(&r1_path, [fastq("a/1", "ACGT"), fastq("b/1", "ACGT")].concat()).unwrap();
    fs::write(&r2_path, fastq("a/2", "ACGT")).unwrap();

    let inputs = InputFiles {
        read1: vec![r1_path],
        read2: vec![r2_path],
        ..InputFiles::default()
    };
    let overlapper = Overlapper::new(config()).unwrap();
    let mut sink = TabSink::new(Vec::new());
    let mut stats = OverlapStats::new();

    let result = overlapper.run(inputs.open().unwrap(), &mut sink, &mut stats);
    assert!(matches!(result, Err(OverlapperError::PairedEndLengthMismatch(_))));
    assert_eq!(stats.pe_in, 1);
}
