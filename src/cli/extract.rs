use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mznovo::features::extract_features;
use mznovo::mascot::MascotResults;

/// Build a feature table for one MGF file
pub fn run(input: PathBuf, mascot: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let output = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        input.with_file_name(format!("{}_features.csv", stem))
    });

    let results = match &mascot {
        Some(path) => Some(
            MascotResults::from_path(path)
                .with_context(|| format!("Failed to parse Mascot results {}", path.display()))?,
        ),
        None => None,
    };

    let (table, stats) = extract_features(&input, results.as_ref())
        .with_context(|| format!("Failed to extract features from {}", input.display()))?;
    table
        .write_csv(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Extraction complete!");
    info!("  Spectra read: {}", stats.spectra_read);
    info!("  Unidentified spectra skipped: {}", stats.unidentified_skipped);
    info!("  Duplicate rows removed: {}", stats.duplicates_removed);
    info!("  Rows written: {} -> {}", stats.rows, output.display());
    Ok(())
}
