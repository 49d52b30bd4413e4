use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mznovo::pipeline::{Pipeline, PipelineConfig};

use super::config::Config;
use super::SplitArgs;

/// Run every stage over the MGF files found in `dir`
pub fn run(
    dir: PathBuf,
    config_path: Option<PathBuf>,
    name: Option<String>,
    output: Option<PathBuf>,
    no_annotate: bool,
    split: SplitArgs,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let partitioner = config.partitioner(&split)?;
    let section = config.pipeline;

    let defaults = PipelineConfig::default();
    let pipeline_config = PipelineConfig {
        dataset_name: name
            .or(section.dataset_name)
            .unwrap_or(defaults.dataset_name),
        mgf_suffix: section.mgf_suffix.unwrap_or(defaults.mgf_suffix),
        annotate: !no_annotate && section.annotate.unwrap_or(defaults.annotate),
        probabilities: *partitioner.probabilities(),
        strategy: partitioner.strategy(),
        seed: partitioner.seed(),
    };
    let output_dir = output
        .or(section.output_dir)
        .unwrap_or_else(|| dir.clone());

    let pipeline = Pipeline::new(pipeline_config);
    let inputs = pipeline
        .discover_inputs(&dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    if inputs.is_empty() {
        anyhow::bail!(
            "No files ending in {} found in {}",
            pipeline.config().mgf_suffix,
            dir.display()
        );
    }
    for (index, input) in inputs.iter().enumerate() {
        info!("  F{}: {}", index, input.display());
    }

    let report = pipeline
        .run(&inputs, &output_dir)
        .context("Batch run failed")?;

    info!("Batch complete!");
    info!("  Runs: {}", report.inputs.len());
    info!("  Merged spectra: {}", report.merged_mgf.display());
    info!(
        "  Merged features: {} ({} rows)",
        report.merged_features.display(),
        report.feature_rows
    );
    info!(
        "  Split: {} train, {} valid, {} test",
        report.partition.train_rows, report.partition.valid_rows, report.partition.test_rows
    );
    info!("  Report: {}", pipeline.report_path(&output_dir).display());
    Ok(())
}
