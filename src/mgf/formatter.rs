use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, info};

use super::{MgfError, MgfReader, MgfWriter};

/// Spectrum parameters kept by [`format_mgf`], in output order
pub const DEEPNOVO_KEYS: [&str; 5] = ["title", "pepmass", "charge", "scans", "rtinseconds"];

/// Statistics from formatting an MGF file
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FormatStats {
    /// Spectra read from the input
    pub spectra_read: usize,
    /// Spectra written to the output
    pub spectra_written: usize,
    /// Spectra discarded because their peak list was empty
    pub empty_discarded: usize,
    /// Total parameters removed across all written spectra
    pub params_dropped: usize,
}

/// Rewrite an MGF file so that every spectrum carries only [`DEEPNOVO_KEYS`],
/// in that order. Spectra without peaks are dropped.
///
/// Spectra are streamed: one is read, filtered and written before the next is
/// read. The output file is truncated first.
pub fn format_mgf<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
) -> Result<FormatStats, MgfError> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();
    info!(
        "Formatting {} -> {}",
        input_path.display(),
        output_path.display()
    );

    let reader = MgfReader::open(input_path)?;
    let mut writer = MgfWriter::create(output_path)?;
    let stats = format_spectra(reader, &mut writer)?;
    writer.finish()?;

    info!(
        "  {} spectra written, {} empty spectra discarded",
        stats.spectra_written, stats.empty_discarded
    );
    Ok(stats)
}

/// Filter every spectrum from `reader` into `writer`
pub fn format_spectra<R: BufRead, W: Write>(
    reader: MgfReader<R>,
    writer: &mut MgfWriter<W>,
) -> Result<FormatStats, MgfError> {
    let mut stats = FormatStats::default();
    for spectrum in reader {
        let mut spectrum = spectrum?;
        stats.spectra_read += 1;

        if spectrum.is_empty() {
            debug!("Discarding empty spectrum {}", spectrum.label());
            stats.empty_discarded += 1;
            continue;
        }

        stats.params_dropped += spectrum.retain_params(&DEEPNOVO_KEYS);
        writer.write(&spectrum)?;
        stats.spectra_written += 1;
    }
    Ok(stats)
}
