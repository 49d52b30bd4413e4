use super::*;
use std::io::{BufReader, Cursor};

const SMALL_MGF: &str = "\
COM=test run
CHARGE=2+
BEGIN IONS
TITLE=run1.1.1.2 File:\"run1.raw\"
PEPMASS=512.7731 18210.4
CHARGE=3+
SCANS=1
RTINSECONDS=1290.44
INSTRUMENT=ESI-QUAD-TOF
175.119 1503.2
262.151 880
END IONS

BEGIN IONS
TITLE=run1.2.2.2
PEPMASS=601.3
SCANS=2
RTINSECONDS=1300.5
END IONS

BEGIN IONS
TITLE=run1.3.3.2
RTINSECONDS=1310
SCANS=3
PEPMASS=700.25
ION_MOBILITY=0.9
100.5 10 1+
END IONS
";

fn read_all(text: &str) -> Vec<MgfSpectrum> {
    MgfReader::new(BufReader::new(Cursor::new(text.to_string())))
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn test_read_small_mgf() {
    let spectra = read_all(SMALL_MGF);
    assert_eq!(spectra.len(), 3);

    let first = &spectra[0];
    assert_eq!(first.title(), Some("run1.1.1.2 File:\"run1.raw\""));
    assert_eq!(first.scans().unwrap(), "1");
    assert_eq!(first.peaks.len(), 2);
    assert_eq!(first.peaks[0], Peak::new(175.119, 1503.2));
    // Spectrum-level CHARGE overrides the file-level default
    assert_eq!(first.charge().unwrap(), 3);
    assert_eq!(first.param("com"), Some("test run"));

    let second = &spectra[1];
    assert!(second.is_empty());
    // Inherited from the file header
    assert_eq!(second.charge().unwrap(), 2);

    // Fragment charge column is ignored
    assert_eq!(spectra[2].peaks, vec![Peak::new(100.5, 10.0)]);
}

#[test]
fn test_pepmass_variants() {
    let mut spectrum = MgfSpectrum::new();
    spectrum.set_param("PEPMASS", "512.7731 18210.4 2+");
    assert_eq!(spectrum.pepmass().unwrap(), vec![512.7731, 18210.4, 2.0]);
    assert_eq!(spectrum.precursor_mz().unwrap(), 512.7731);

    spectrum.set_param("pepmass", "601.3");
    assert_eq!(spectrum.precursor_mz().unwrap(), 601.3);

    spectrum.set_param("pepmass", "abc");
    let err = spectrum.precursor_mz().unwrap_err();
    assert!(matches!(err, MgfError::InvalidParameter { parameter: "pepmass", .. }));
    assert_eq!(err.kind(), crate::error::ErrorKind::Format);
}

#[test]
fn test_charge_list() {
    let mut spectrum = MgfSpectrum::new();
    spectrum.set_param("charge", "2+ and 3+");
    assert_eq!(spectrum.charges().unwrap(), vec![2, 3]);
    assert_eq!(spectrum.charge().unwrap(), 2);

    spectrum.set_param("charge", "3-");
    assert_eq!(spectrum.charge().unwrap(), -3);

    spectrum.set_param("charge", "4");
    assert_eq!(spectrum.charge().unwrap(), 4);

    spectrum.params.clear();
    assert!(matches!(
        spectrum.charge(),
        Err(MgfError::MissingParameter { parameter: "charge", .. })
    ));
}

#[test]
fn test_unterminated_spectrum() {
    let text = "BEGIN IONS\nTITLE=a\n100 1\n";
    let mut reader = MgfReader::new(BufReader::new(Cursor::new(text)));
    let err = reader.next_spectrum().unwrap_err();
    assert!(matches!(err, MgfError::UnterminatedSpectrum { line_number: 1 }));
    assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
    assert!(reader.next_spectrum().unwrap().is_none());
}

#[test]
fn test_malformed_peak_line() {
    let text = "BEGIN IONS\nTITLE=a\n100 abc\nEND IONS\n";
    let mut reader = MgfReader::new(BufReader::new(Cursor::new(text)));
    assert!(matches!(
        reader.next_spectrum(),
        Err(MgfError::MalformedPeakLine { line_number: 3, .. })
    ));
}

#[test]
fn test_format_spectra_filters_and_orders() {
    let reader = MgfReader::new(BufReader::new(Cursor::new(SMALL_MGF)));
    let mut writer = MgfWriter::new(Vec::new());
    let stats = format_spectra(reader, &mut writer).unwrap();

    assert_eq!(stats.spectra_read, 3);
    assert_eq!(stats.spectra_written, 2);
    assert_eq!(stats.empty_discarded, 1);

    let output = String::from_utf8(writer.finish().unwrap()).unwrap();
    let spectra = read_all(&output);
    assert_eq!(spectra.len(), 2);
    for spectrum in &spectra {
        assert!(!spectrum.is_empty());
        let keys: Vec<&str> = spectrum.params.keys().map(String::as_str).collect();
        let expected: Vec<&str> = DEEPNOVO_KEYS
            .iter()
            .copied()
            .filter(|k| spectrum.params.contains_key(*k))
            .collect();
        assert_eq!(keys, expected);
    }

    // The third spectrum declared RTINSECONDS before SCANS and had no CHARGE
    // of its own; the file-level CHARGE is kept
    let keys: Vec<&str> = spectra[1].params.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "pepmass", "charge", "scans", "rtinseconds"]);
    assert!(output.contains("BEGIN IONS\nTITLE=run1.1.1.2"));
    assert!(!output.contains("INSTRUMENT"));
    assert!(!output.contains("ION_MOBILITY"));
}

#[test]
fn test_merge_renumbers_scans() {
    let file_a = "BEGIN IONS\nTITLE=a\nSCANS=5\n100 1\nEND IONS\n";
    let file_b = "BEGIN IONS\nTITLE=b\nSCANS=5\n200 1\nEND IONS";

    let mut output = Vec::new();
    let mut stats = MergeStats::default();
    merge_mgf_into(
        crate::scan::FileIndex(0),
        Cursor::new(file_a),
        &mut output,
        &mut stats,
    )
    .unwrap();
    merge_mgf_into(
        crate::scan::FileIndex(1),
        Cursor::new(file_b),
        &mut output,
        &mut stats,
    )
    .unwrap();

    let text = String::from_utf8(output).unwrap();
    let scan_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("SCANS=")).collect();
    assert_eq!(scan_lines, vec!["SCANS=F0:5", "SCANS=F1:5"]);
    assert_eq!(stats.files_merged, 2);
    assert_eq!(stats.scans_renumbered, 2);
    assert!(text.ends_with("END IONS\n"));
    assert_eq!(read_all(&text).len(), 2);
}

#[test]
fn test_merge_leaves_other_lines_untouched() {
    let source = "COM=x\r\nBEGIN IONS\r\nTITLE=SCANS=7 in title\r\nSCANS=7\r\nEND IONS\r\n";
    let mut output = Vec::new();
    let mut stats = MergeStats::default();
    merge_mgf_into(
        crate::scan::FileIndex(2),
        Cursor::new(source),
        &mut output,
        &mut stats,
    )
    .unwrap();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("TITLE=SCANS=7 in title\r\n"));
    assert!(text.contains("SCANS=F2:7\r\n"));
    assert!(!text.replace("\r\n", "").contains('\n'));
    assert_eq!(stats.scans_renumbered, 1);
}

#[test]
fn test_merge_matches_scans_like_reader() {
    let source = "BEGIN IONS\nscans=5\n100 1\nEND IONS\nBEGIN IONS\n  Scans = 6 \n100 1\nEND IONS\n";
    let mut output = Vec::new();
    let mut stats = MergeStats::default();
    for index in 0..2 {
        merge_mgf_into(
            crate::scan::FileIndex(index),
            Cursor::new(source),
            &mut output,
            &mut stats,
        )
        .unwrap();
    }
    assert_eq!(stats.scans_renumbered, 4);

    let text = String::from_utf8(output).unwrap();
    let scans: Vec<String> = read_all(&text)
        .iter()
        .filter_map(|s| s.param("scans").map(str::to_string))
        .collect();
    assert_eq!(scans, vec!["F0:5", "F0:6", "F1:5", "F1:6"]);
}
