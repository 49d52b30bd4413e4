//! Annotated MGF export.
//!
//! Writes a copy of an MGF file in which every spectrum carries a `SEQ=`
//! parameter with its Mascot-identified sequence. A spectrum identified with
//! several distinct sequences is written once per sequence; spectra without
//! any rank-1 identification are left out.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;

use crate::mascot::MascotResults;
use crate::mgf::{MgfError, MgfReader, MgfWriter};

/// Statistics from annotating one MGF file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotateStats {
    /// Spectra read from the input
    pub spectra_read: usize,
    /// Spectra with at least one identification
    pub spectra_annotated: usize,
    /// Spectra dropped for lack of an identification
    pub unidentified_dropped: usize,
    /// Spectrum records written (one per sequence)
    pub records_written: usize,
}

/// `run1.dat.mgf` -> `run1.dat_annotated.mgf`
pub fn annotated_path(mgf_path: &Path) -> PathBuf {
    let stem = mgf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match mgf_path.extension() {
        Some(ext) => {
            mgf_path.with_file_name(format!("{}_annotated.{}", stem, ext.to_string_lossy()))
        }
        None => mgf_path.with_file_name(format!("{}_annotated", stem)),
    }
}

/// Annotate `mgf_path` with sequences from `mascot` into `output_path`
pub fn annotate_mgf<P: AsRef<Path>, Q: AsRef<Path>>(
    mgf_path: P,
    mascot: &MascotResults,
    output_path: Q,
) -> Result<AnnotateStats, MgfError> {
    let mgf_path = mgf_path.as_ref();
    let output_path = output_path.as_ref();
    info!(
        "Annotating {} -> {}",
        mgf_path.display(),
        output_path.display()
    );

    let reader = MgfReader::open(mgf_path)?;
    let mut writer = MgfWriter::create(output_path)?;
    let stats = annotate_spectra(reader, mascot, &mut writer)?;
    writer.finish()?;

    info!(
        "  {} of {} spectra annotated, {} records written",
        stats.spectra_annotated, stats.spectra_read, stats.records_written
    );
    Ok(stats)
}

/// Annotate every spectrum from `reader` into `writer`
pub fn annotate_spectra<R: BufRead, W: Write>(
    reader: MgfReader<R>,
    mascot: &MascotResults,
    writer: &mut MgfWriter<W>,
) -> Result<AnnotateStats, MgfError> {
    let mut stats = AnnotateStats::default();
    for spectrum in reader {
        let spectrum = spectrum?;
        stats.spectra_read += 1;

        let title = spectrum.title().unwrap_or_default();
        let mut matched = false;
        for sequence in mascot.sequences_for(title) {
            let mut annotated = spectrum.clone();
            annotated.set_param("seq", sequence);
            writer.write(&annotated)?;
            stats.records_written += 1;
            matched = true;
        }

        if matched {
            stats.spectra_annotated += 1;
        } else {
            debug!("No identification for spectrum {}", spectrum.label());
            stats.unidentified_dropped += 1;
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mascot::{ModificationTable, PeptideIdentification};
    use std::io::{BufReader, Cursor};

    const MGF: &str = "\
BEGIN IONS
TITLE=a
SCANS=1
100 1
END IONS
BEGIN IONS
TITLE=b
SCANS=2
200 2
END IONS
";

    #[test]
    fn test_annotate_spectra() {
        let results = MascotResults::new(
            ModificationTable::new(),
            vec![
                PeptideIdentification {
                    spectrum_title: "a".to_string(),
                    sequence: "PEPK".to_string(),
                    rank: 1,
                },
                PeptideIdentification {
                    spectrum_title: "a".to_string(),
                    sequence: "M(Oxidation)EPK".to_string(),
                    rank: 1,
                },
            ],
        );
        let reader = MgfReader::new(BufReader::new(Cursor::new(MGF.to_string())));
        let mut writer = MgfWriter::new(Vec::new());
        let stats = annotate_spectra(reader, &results, &mut writer).unwrap();
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert_eq!(stats.spectra_read, 2);
        assert_eq!(stats.spectra_annotated, 1);
        assert_eq!(stats.unidentified_dropped, 1);
        assert_eq!(stats.records_written, 2);
        assert!(text.contains("SCANS=1\nSEQ=PEPK\n"));
        assert!(text.contains("SEQ=M(Oxidation)EPK\n"));
        assert!(!text.contains("TITLE=b"));
    }

    #[test]
    fn test_annotated_path() {
        assert_eq!(
            annotated_path(Path::new("data/run1.dat.mgf")),
            PathBuf::from("data/run1.dat_annotated.mgf")
        );
    }
}
