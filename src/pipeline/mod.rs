//! # Pipeline Module
//!
//! The batch driver. Given an ordered list of MGF runs it:
//!
//! 1. formats run `i` to `<out>/F<i>_<stem>_formatted.mgf`
//! 2. extracts `<out>/F<i>_<stem>_features.csv`, joined with `<stem>.xml` from
//!    the input's directory when annotation is enabled
//! 3. merges the formatted spectra into `<out>/spectrum_<name>.mgf`
//! 4. merges the feature tables into `<out>/features_<name>.csv`
//! 5. partitions that table into `features_<name>_{train,valid,test}.csv`
//! 6. writes `<out>/<name>_report.json`
//!
//! Per-run outputs carry the file index, so runs sharing a file stem in
//! different directories never overwrite each other.
//! The same input order drives both merges, so `F<index>:` prefixes in the
//! merged spectra and the merged features always refer to the same run.
//! The first error aborts the batch; outputs written so far are left as is.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::features::{
    extract_features, merge_features, PartitionStrategy, Partitioner, SplitProbabilities,
};
use crate::mascot::MascotResults;
use crate::mgf::{format_mgf, merge_mgf};
use crate::scan::FileIndex;

mod error;
mod report;


pub use error::PipelineError;
pub use report::{BatchReport, InputReport};

/// File name suffix of the raw per-run spectrum files
pub const DEFAULT_MGF_SUFFIX: &str = ".dat.mgf";

/// Default dataset name used in merged output file names
pub const DEFAULT_DATASET_NAME: &str = "dataset";

const FORMATTED_SUFFIX: &str = "_formatted.mgf";
const FEATURES_SUFFIX: &str = "_features.csv";

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Name used in merged output file names
    pub dataset_name: String,
    /// Suffix used by [`discover_inputs`]
    pub mgf_suffix: String,
    /// Join each run with its Mascot results
    pub annotate: bool,
    /// Train/valid/test probabilities
    pub probabilities: SplitProbabilities,
    /// Partition assignment unit
    pub strategy: PartitionStrategy,
    /// Fixed RNG seed
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            mgf_suffix: DEFAULT_MGF_SUFFIX.to_string(),
            annotate: true,
            probabilities: SplitProbabilities::default(),
            strategy: PartitionStrategy::Row,
            seed: None,
        }
    }
}

/// List files in `dir` whose names end with `suffix`, sorted by path
pub fn discover_inputs<P: AsRef<Path>>(
    dir: P,
    suffix: &str,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if matches && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Mascot results expected for an MGF input: `run1.dat.mgf` -> `run1.dat.xml`
pub fn mascot_path_for(mgf_path: &Path) -> PathBuf {
    mgf_path.with_extension("xml")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Batch driver over explicit input paths
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Path of the merged spectrum file
    pub fn merged_mgf_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("spectrum_{}.mgf", self.config.dataset_name))
    }

    /// Path of the merged feature file
    pub fn merged_features_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("features_{}.csv", self.config.dataset_name))
    }

    /// Path of the formatted spectra written for run `index`
    pub fn formatted_path(&self, index: FileIndex, input: &Path, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}_{}{}", index, file_stem(input), FORMATTED_SUFFIX))
    }

    /// Path of the feature table written for run `index`
    pub fn features_path(&self, index: FileIndex, input: &Path, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}_{}{}", index, file_stem(input), FEATURES_SUFFIX))
    }

    /// Whether `path` is named like a spectrum file this pipeline writes
    pub fn is_output(&self, path: &Path) -> bool {
        let merged = format!("spectrum_{}.mgf", self.config.dataset_name);
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == merged || name.ends_with(FORMATTED_SUFFIX))
    }

    /// [`discover_inputs`] using the configured suffix, minus the spectrum
    /// files a previous run of this pipeline wrote into `dir`
    pub fn discover_inputs<P: AsRef<Path>>(
        &self,
        dir: P,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let mut inputs = discover_inputs(dir, &self.config.mgf_suffix)?;
        inputs.retain(|path| {
            let output = self.is_output(path);
            if output {
                debug!("Skipping pipeline output {}", path.display());
            }
            !output
        });
        Ok(inputs)
    }

    /// Path of the JSON batch report
    pub fn report_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}_report.json", self.config.dataset_name))
    }

    /// Run every stage over `inputs`, in order, writing into `output_dir`
    pub fn run<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        output_dir: &Path,
    ) -> Result<BatchReport, PipelineError> {
        if inputs.is_empty() {
            return Err(PipelineError::NoInputs);
        }
        fs::create_dir_all(output_dir)?;
        info!(
            "Processing {} runs into {} (annotate: {})",
            inputs.len(),
            output_dir.display(),
            self.config.annotate
        );

        let mut input_reports = Vec::with_capacity(inputs.len());
        for (index, input) in inputs.iter().enumerate() {
            let report = self.process_input(FileIndex(index), input.as_ref(), output_dir)?;
            input_reports.push(report);
        }

        let formatted: Vec<&Path> = input_reports.iter().map(|r| r.formatted.as_path()).collect();
        let merged_mgf = self.merged_mgf_path(output_dir);
        let merge = merge_mgf(&formatted, &merged_mgf)?;

        let feature_files: Vec<&Path> = input_reports.iter().map(|r| r.features.as_path()).collect();
        let merged_features = self.merged_features_path(output_dir);
        let table = merge_features(&feature_files)?;
        table.write_csv(&merged_features)?;
        let feature_rows = table.len();

        let partitioner = Partitioner::new(self.config.probabilities)
            .with_strategy(self.config.strategy)
            .with_seed(self.config.seed);
        let partition = partitioner.partition(table);
        let split_files = partition.write_alongside(&merged_features)?;

        let report = BatchReport {
            dataset_name: self.config.dataset_name.clone(),
            inputs: input_reports,
            merged_mgf,
            merge,
            merged_features,
            feature_rows,
            partition_strategy: self.config.strategy,
            seed: self.config.seed,
            partition: partition.stats(),
            split_files,
        };
        let report_path = self.report_path(output_dir);
        report.write_json(&report_path)?;
        info!("Batch report written to {}", report_path.display());
        Ok(report)
    }

    fn process_input(
        &self,
        index: FileIndex,
        input: &Path,
        output_dir: &Path,
    ) -> Result<InputReport, PipelineError> {
        info!("[{}] {}", index, input.display());

        let mascot_path = if self.config.annotate {
            let expected = mascot_path_for(input);
            if !expected.is_file() {
                return Err(PipelineError::MissingMascotFile {
                    mgf: input.to_path_buf(),
                    expected,
                });
            }
            Some(expected)
        } else {
            None
        };

        let formatted = self.formatted_path(index, input, output_dir);
        let format = format_mgf(input, &formatted)?;

        let mascot = mascot_path
            .as_deref()
            .map(MascotResults::from_path)
            .transpose()?;
        let (table, extract) = extract_features(&formatted, mascot.as_ref())?;
        let features = self.features_path(index, input, output_dir);
        table.write_csv(&features)?;

        Ok(InputReport {
            file_index: index.to_string(),
            source: input.to_path_buf(),
            mascot: mascot_path,
            formatted,
            features,
            format,
            extract,
        })
    }
}
