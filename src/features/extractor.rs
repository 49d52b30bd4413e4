use std::io::BufRead;
use std::path::Path;

use log::{debug, info, warn};
use serde::Serialize;

use super::{FeatureError, FeatureRow, FeatureTable};
use crate::mascot::MascotResults;
use crate::mgf::{MgfError, MgfReader, MgfSpectrum};

/// Statistics from extracting features out of one MGF file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Spectra read from the input
    pub spectra_read: usize,
    /// Spectra skipped because no identification matched their title
    pub unidentified_skipped: usize,
    /// Rows produced before deduplication
    pub rows_emitted: usize,
    /// Exact duplicate rows collapsed
    pub duplicates_removed: usize,
    /// Rows in the final table
    pub rows: usize,
}

/// Extract a feature table from an MGF file.
///
/// With `mascot` supplied, each spectrum yields one row per distinct sequence
/// identified for its title and unidentified spectra yield nothing. Without
/// it, each spectrum yields exactly one row with an empty `seq`.
pub fn extract_features<P: AsRef<Path>>(
    mgf_path: P,
    mascot: Option<&MascotResults>,
) -> Result<(FeatureTable, ExtractStats), FeatureError> {
    let mgf_path = mgf_path.as_ref();
    info!(
        "Extracting features from {} ({})",
        mgf_path.display(),
        if mascot.is_some() {
            "annotated"
        } else {
            "unannotated"
        }
    );

    let reader = MgfReader::open(mgf_path)?;
    let (table, stats) = extract_from_reader(reader, mascot)?;

    if stats.unidentified_skipped > 0 {
        warn!(
            "{}: {} of {} spectra had no rank-1 identification and were skipped",
            mgf_path.display(),
            stats.unidentified_skipped,
            stats.spectra_read
        );
    }
    info!(
        "  {} feature rows ({} duplicates removed)",
        stats.rows, stats.duplicates_removed
    );
    Ok((table, stats))
}

/// Extract a feature table from already-open MGF input
pub fn extract_from_reader<R: BufRead>(
    reader: MgfReader<R>,
    mascot: Option<&MascotResults>,
) -> Result<(FeatureTable, ExtractStats), FeatureError> {
    let mut table = FeatureTable::new();
    let mut stats = ExtractStats::default();

    for spectrum in reader {
        let spectrum = spectrum?;
        stats.spectra_read += 1;

        let scan = spectrum.scans()?;
        let mz = spectrum.precursor_mz()?;
        let z = spectrum.charge()?;
        let rt = spectrum.retention_time()?;

        match mascot {
            None => table.push(FeatureRow::new(scan, mz, z, rt, "")),
            Some(results) => {
                let title = required_title(&spectrum)?;
                let before = table.len();
                for sequence in results.sequences_for(title) {
                    table.push(FeatureRow::new(scan, mz, z, rt, sequence));
                }
                if table.len() == before {
                    debug!("No identification for spectrum {}", title);
                    stats.unidentified_skipped += 1;
                }
            }
        }
    }

    stats.rows_emitted = table.len();
    stats.duplicates_removed = table.dedup();
    stats.rows = table.len();
    Ok((table, stats))
}

fn required_title(spectrum: &MgfSpectrum) -> Result<&str, MgfError> {
    spectrum.title().ok_or_else(|| MgfError::MissingParameter {
        spectrum: spectrum.label(),
        parameter: "title",
    })
}
