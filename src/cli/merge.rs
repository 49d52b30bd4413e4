use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mznovo::features::merge_features;
use mznovo::mgf::merge_mgf;

/// Merge MGF files with scan renumbering
pub fn run_mgf(inputs: Vec<PathBuf>, output: PathBuf) -> Result<()> {
    let stats = merge_mgf(&inputs, &output)
        .with_context(|| format!("Failed to merge MGF files into {}", output.display()))?;

    info!("Merge complete!");
    info!("  Files merged: {}", stats.files_merged);
    info!("  Scans renumbered: {}", stats.scans_renumbered);
    Ok(())
}

/// Merge feature tables with scan renumbering
pub fn run_features(inputs: Vec<PathBuf>, output: PathBuf) -> Result<()> {
    let table = merge_features(&inputs).context("Failed to merge feature tables")?;
    table
        .write_csv(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Merged {} rows into {}", table.len(), output.display());
    Ok(())
}
