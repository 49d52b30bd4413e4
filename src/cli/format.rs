use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mznovo::mgf::format_mgf;

/// Restrict spectrum parameters to the DeepNovo key set
pub fn run(input: PathBuf, output: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let stats = format_mgf(&input, &output)
        .with_context(|| format!("Failed to format {}", input.display()))?;

    info!("Formatting complete!");
    info!("  Spectra read: {}", stats.spectra_read);
    info!("  Spectra written: {}", stats.spectra_written);
    info!("  Empty spectra discarded: {}", stats.empty_discarded);
    info!("  Parameters dropped: {}", stats.params_dropped);
    Ok(())
}
