use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mznovo::annotate::{annotate_mgf, annotated_path};
use mznovo::mascot::MascotResults;

/// Write an MGF copy carrying SEQ= annotations
pub fn run(input: PathBuf, mascot: PathBuf, output: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    let output = output.unwrap_or_else(|| annotated_path(&input));

    let results = MascotResults::from_path(&mascot)
        .with_context(|| format!("Failed to parse Mascot results {}", mascot.display()))?;
    let stats = annotate_mgf(&input, &results, &output)
        .with_context(|| format!("Failed to annotate {}", input.display()))?;

    info!("Annotation complete!");
    info!("  Spectra annotated: {}", stats.spectra_annotated);
    info!("  Unidentified spectra dropped: {}", stats.unidentified_dropped);
    info!("  Records written: {} -> {}", stats.records_written, output.display());
    Ok(())
}
