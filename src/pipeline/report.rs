use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::PipelineError;
use crate::features::{ExtractStats, PartitionStats, PartitionStrategy};
use crate::mgf::{FormatStats, MergeStats};

/// Per-input section of a [`BatchReport`]
#[derive(Debug, Clone, Serialize)]
pub struct InputReport {
    /// Scan prefix assigned to this input by both mergers, e.g. `F0`
    pub file_index: String,
    /// Original MGF file
    pub source: PathBuf,
    /// Mascot XML joined during extraction, if any
    pub mascot: Option<PathBuf>,
    /// Formatted MGF written for this input
    pub formatted: PathBuf,
    /// Feature CSV written for this input
    pub features: PathBuf,
    /// Formatter statistics
    pub format: FormatStats,
    /// Extractor statistics
    pub extract: ExtractStats,
}

/// Summary of a batch run, written as `<name>_report.json`
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Dataset name used in output file names
    pub dataset_name: String,
    /// Inputs in merge order
    pub inputs: Vec<InputReport>,
    /// Merged spectrum file
    pub merged_mgf: PathBuf,
    /// Spectrum merge statistics
    pub merge: MergeStats,
    /// Merged feature file
    pub merged_features: PathBuf,
    /// Rows in the merged feature table
    pub feature_rows: usize,
    /// Partition assignment unit
    pub partition_strategy: PartitionStrategy,
    /// RNG seed, when one was fixed
    pub seed: Option<u64>,
    /// Partition row counts
    pub partition: PartitionStats,
    /// Train, valid and test files
    pub split_files: Vec<PathBuf>,
}

impl BatchReport {
    /// Write the report as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
