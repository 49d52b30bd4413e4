//! Integration tests for mznovo
//!
//! These tests drive each stage through files on disk, the way the batch
//! driver chains them.

use mznovo::annotate::annotate_mgf;
use mznovo::features::{
    extract_features, merge_features, FeatureRow, FeatureTable, Partitioner, Split,
};
use mznovo::mascot::parse_mascot_xml;
use mznovo::mgf::{format_mgf, merge_mgf, MgfReader, DEEPNOVO_KEYS};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const RUN_MGF: &str = "\
MASS=Monoisotopic
BEGIN IONS
TITLE=smbp.5.5.2 File:\"smbp.raw\"
PEPMASS=512.7731 18210.4
CHARGE=2+
SCANS=5
RTINSECONDS=1290.44
INSTRUMENT=ESI-QUAD-TOF
SEQ=IGNORED
175.119 1503.2
262.151 880.0
END IONS

BEGIN IONS
TITLE=smbp.6.6.2
PEPMASS=520.2
CHARGE=2+
SCANS=6
RTINSECONDS=1295.0
END IONS

BEGIN IONS
RTINSECONDS=1300.1
SCANS=7
CHARGE=3+
PEPMASS=610.3
TITLE=smbp.7.7.3
110.07 42
END IONS
";

const RUN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mascot_search_results xmlns="http://www.matrixscience.com/xmlns/schema/mascot_search_results_2">
  <variable_mods>
    <modification identifier="1">
      <name>Carbamidomethyl (C)</name>
    </modification>
  </variable_mods>
  <hits>
    <hit number="1">
      <protein accession="ALBU_BOVIN">
        <peptide query="1" rank="1">
          <pep_seq>ACDK</pep_seq>
          <pep_var_mod_pos>0.0100.0</pep_var_mod_pos>
          <pep_scan_title>smbp.5.5.2 File:&quot;smbp.raw&quot;</pep_scan_title>
        </peptide>
        <peptide query="1" rank="2">
          <pep_seq>ACEK</pep_seq>
          <pep_var_mod_pos>0.0000.0</pep_var_mod_pos>
          <pep_scan_title>smbp.5.5.2 File:&quot;smbp.raw&quot;</pep_scan_title>
        </peptide>
      </protein>
    </hit>
    <hit number="2">
      <protein accession="ALBU_HUMAN">
        <peptide query="1" rank="1">
          <pep_seq>ACDR</pep_seq>
          <pep_var_mod_pos>0.0000.0</pep_var_mod_pos>
          <pep_scan_title>smbp.5.5.2 File:&quot;smbp.raw&quot;</pep_scan_title>
        </peptide>
      </protein>
    </hit>
  </hits>
</mascot_search_results>"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Formatting keeps only the DeepNovo keys, in order, and drops empty spectra
#[test]
fn test_format_mgf_file() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "smbp.dat.mgf", RUN_MGF);
    let output = dir.path().join("smbp_formatted.mgf");

    let stats = format_mgf(&input, &output).unwrap();
    assert_eq!(stats.spectra_read, 3);
    assert_eq!(stats.spectra_written, 2);
    assert_eq!(stats.empty_discarded, 1);

    let spectra: Vec<_> = MgfReader::open(&output)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(spectra.len(), 2);
    for spectrum in &spectra {
        assert!(!spectrum.is_empty());
        let keys: Vec<&str> = spectrum.params.keys().map(String::as_str).collect();
        assert_eq!(keys, DEEPNOVO_KEYS.to_vec());
    }

    // Formatting an already formatted file changes nothing
    let again = dir.path().join("smbp_formatted_again.mgf");
    format_mgf(&output, &again).unwrap();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        fs::read_to_string(&again).unwrap()
    );
}

/// Two files reusing SCANS=5 stay distinguishable after merging
#[test]
fn test_merge_mgf_files() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.mgf", "BEGIN IONS\nSCANS=5\n100 1\nEND IONS\n");
    let b = write(dir.path(), "b.mgf", "BEGIN IONS\nSCANS=5\n100 1\nEND IONS");
    let output = dir.path().join("merged.mgf");

    let stats = merge_mgf(&[&a, &b], &output).unwrap();
    assert_eq!(stats.files_merged, 2);
    assert_eq!(stats.scans_renumbered, 2);

    let merged = fs::read_to_string(&output).unwrap();
    let scans: Vec<&str> = merged
        .lines()
        .filter(|line| line.starts_with("SCANS="))
        .collect();
    assert_eq!(scans, vec!["SCANS=F0:5", "SCANS=F1:5"]);
    assert_eq!(merged.matches("END IONS").count(), 2);
}

/// Extraction with Mascot results keeps rank-1 matches only, one row each
#[test]
fn test_extract_with_mascot() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "smbp.dat.mgf", RUN_MGF);
    let xml = write(dir.path(), "smbp.dat.xml", RUN_XML);

    let mascot = parse_mascot_xml(&xml).unwrap();
    let (table, stats) = extract_features(&input, Some(&mascot)).unwrap();

    assert_eq!(stats.spectra_read, 3);
    assert_eq!(stats.unidentified_skipped, 2);
    let seqs: Vec<&str> = table.iter().map(|r| r.seq.as_str()).collect();
    assert_eq!(seqs, vec!["AC(Carbamidomethyl)DK", "ACDR"]);
    assert!(table.iter().all(|r| r.scans == "5" && r.z == 2));
    assert!(table.iter().all(|r| r.mz == 512.7731));
}

/// Without Mascot results every spectrum yields one row with an empty seq
#[test]
fn test_extract_without_mascot() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "smbp.dat.mgf", RUN_MGF);

    let (table, stats) = extract_features(&input, None).unwrap();
    assert_eq!(stats.rows_emitted, 3);
    assert_eq!(table.len(), 3);
    assert!(table.iter().all(|r| r.seq.is_empty()));
}

/// Feature files written per run merge with the same prefixes as the spectra
#[test]
fn test_merge_feature_files() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "smbp.dat.mgf", RUN_MGF);
    let (table, _) = extract_features(&input, None).unwrap();

    let first = dir.path().join("a_features.csv");
    let second = dir.path().join("b_features.csv");
    table.write_csv(&first).unwrap();
    table.write_csv(&second).unwrap();

    let merged = merge_features(&[&first, &second]).unwrap();
    assert_eq!(merged.len(), 6);
    let scans: Vec<&str> = merged.iter().map(|r| r.scans.as_str()).collect();
    assert_eq!(scans, vec!["F0:5", "F0:6", "F0:7", "F1:5", "F1:6", "F1:7"]);
    assert!(merged.iter().all(|r| r.spec_group_id == r.scans));
}

/// Annotated export writes one record per identified sequence
#[test]
fn test_annotate_mgf_file() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "smbp.dat.mgf", RUN_MGF);
    let xml = write(dir.path(), "smbp.dat.xml", RUN_XML);
    let output = dir.path().join("smbp.dat_annotated.mgf");

    let mascot = parse_mascot_xml(&xml).unwrap();
    let stats = annotate_mgf(&input, &mascot, &output).unwrap();
    assert_eq!(stats.records_written, 2);

    let spectra: Vec<_> = MgfReader::open(&output)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let seqs: Vec<&str> = spectra.iter().filter_map(|s| s.param("seq")).collect();
    assert_eq!(seqs, vec!["AC(Carbamidomethyl)DK", "ACDR"]);
}

/// 10,000 rows split 80/10/10 within statistical tolerance, disjoint and complete
#[test]
fn test_partition_large_table() {
    let table: FeatureTable = (0..10_000)
        .map(|i| FeatureRow::new(&format!("F0:{}", i), 500.0, 2, i as f64, ""))
        .collect();
    let partition = Partitioner::default().with_seed(Some(2024)).partition(table);

    let stats = partition.stats();
    assert_eq!(stats.input_rows, 10_000);
    assert!((7_700..=8_300).contains(&stats.train_rows), "{:?}", stats);
    assert!((850..=1_150).contains(&stats.valid_rows), "{:?}", stats);
    assert!((850..=1_150).contains(&stats.test_rows), "{:?}", stats);

    let mut seen = HashSet::new();
    for split in Split::ALL {
        for row in partition.get(split) {
            assert!(seen.insert(row.scans.clone()), "{} in two splits", row.scans);
        }
    }
    assert_eq!(seen.len(), 10_000);
}

/// Split files land next to the merged table
#[test]
fn test_partition_files_written() {
    let dir = tempdir().unwrap();
    let features = dir.path().join("features_smbp.csv");
    let table: FeatureTable = (0..20)
        .map(|i| FeatureRow::new(&i.to_string(), 500.0, 2, 1.0, ""))
        .collect();

    let written = Partitioner::default()
        .with_seed(Some(1))
        .partition(table)
        .write_alongside(&features)
        .unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "features_smbp_train.csv",
            "features_smbp_valid.csv",
            "features_smbp_test.csv"
        ]
    );
    let total: usize = written
        .iter()
        .map(|p| FeatureTable::read_csv(p).unwrap().len())
        .sum();
    assert_eq!(total, 20);
}
