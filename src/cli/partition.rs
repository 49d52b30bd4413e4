use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mznovo::features::FeatureTable;

use super::config::Config;
use super::SplitArgs;

/// Split one feature table into train, valid and test files
pub fn run(input: PathBuf, config: Option<PathBuf>, split: SplitArgs) -> Result<()> {
    let config = Config::load(config.as_deref())?;
    let partitioner = config.partitioner(&split)?;

    let table = FeatureTable::read_csv(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let partition = partitioner.partition(table);
    let written = partition
        .write_alongside(&input)
        .context("Failed to write partition files")?;

    let stats = partition.stats();
    info!("Partition complete!");
    info!(
        "  {} rows: {} train, {} valid, {} test",
        stats.input_rows, stats.train_rows, stats.valid_rows, stats.test_rows
    );
    for path in written {
        info!("  {}", path.display());
    }
    Ok(())
}
