//! TOML configuration file support for batch runs.
//!
//! Instead of passing many CLI flags, users can specify settings in a config file:
//!
//! ```toml
//! # mznovo.toml
//! [pipeline]
//! dataset_name = "smbp"
//! mgf_suffix = ".dat.mgf"
//! annotate = true
//! output_dir = "deepnovo"
//!
//! [partition]
//! train = 0.8
//! valid = 0.1
//! test = 0.1
//! seed = 42
//! by_spectrum = false
//! ```
//!
//! Command-line flags take precedence over file values, which take precedence
//! over the built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use mznovo::features::{PartitionStrategy, Partitioner, SplitProbabilities};

use super::SplitArgs;

/// Root configuration structure for mznovo.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Batch driver settings.
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Train/valid/test split settings.
    #[serde(default)]
    pub partition: PartitionSection,
}

/// Configuration for the run command.
#[derive(Debug, Default, Deserialize)]
pub struct PipelineSection {
    /// Name used in merged output file names.
    pub dataset_name: Option<String>,

    /// File name suffix of the input MGF files.
    pub mgf_suffix: Option<String>,

    /// Join each run with its Mascot XML results.
    pub annotate: Option<bool>,

    /// Directory receiving every output file.
    pub output_dir: Option<PathBuf>,
}

/// Configuration for partitioning.
#[derive(Debug, Default, Deserialize)]
pub struct PartitionSection {
    /// Train probability.
    pub train: Option<f64>,

    /// Validation probability.
    pub valid: Option<f64>,

    /// Test probability.
    pub test: Option<f64>,

    /// RNG seed.
    pub seed: Option<u64>,

    /// Draw once per spectrum instead of once per row.
    pub by_spectrum: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, else the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Build a partitioner from command-line flags layered over this file.
    pub fn partitioner(&self, args: &SplitArgs) -> Result<Partitioner> {
        let defaults = SplitProbabilities::default();
        let section = &self.partition;
        let probabilities = SplitProbabilities::new(
            args.train.or(section.train).unwrap_or(defaults.train()),
            args.valid.or(section.valid).unwrap_or(defaults.valid()),
            args.test.or(section.test).unwrap_or(defaults.test()),
        )
        .context("Invalid split probabilities")?;

        let strategy = if args.by_spectrum || section.by_spectrum.unwrap_or(false) {
            PartitionStrategy::Spectrum
        } else {
            PartitionStrategy::Row
        };

        Ok(Partitioner::new(probabilities)
            .with_strategy(strategy)
            .with_seed(args.seed.or(section.seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [pipeline]
            dataset_name = "smbp"
            mgf_suffix = ".mgf"
            annotate = false
            output_dir = "out"

            [partition]
            train = 0.7
            valid = 0.2
            test = 0.1
            seed = 42
            by_spectrum = true
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.pipeline.dataset_name.as_deref(), Some("smbp"));
        assert_eq!(config.pipeline.mgf_suffix.as_deref(), Some(".mgf"));
        assert_eq!(config.pipeline.annotate, Some(false));
        assert_eq!(config.pipeline.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.partition.train, Some(0.7));
        assert_eq!(config.partition.seed, Some(42));
        assert_eq!(config.partition.by_spectrum, Some(true));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [partition]
            seed = 7
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.partition.seed, Some(7));
        assert_eq!(config.partition.train, None);
        assert_eq!(config.pipeline.dataset_name, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.pipeline.annotate, None);
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::from_str(
            r#"
            [partition]
            train = 0.6
            valid = 0.2
            test = 0.2
            "#,
        )
        .unwrap();
        let args = SplitArgs {
            train: Some(0.8),
            valid: Some(0.1),
            test: Some(0.1),
            by_spectrum: true,
            ..Default::default()
        };
        let partitioner = config.partitioner(&args).unwrap();
        assert_eq!(partitioner.probabilities().train(), 0.8);
        assert_eq!(partitioner.strategy(), PartitionStrategy::Spectrum);

        let from_file = config.partitioner(&SplitArgs::default()).unwrap();
        assert_eq!(from_file.probabilities().train(), 0.6);
        assert_eq!(from_file.strategy(), PartitionStrategy::Row);
    }

    #[test]
    fn test_invalid_probabilities_rejected() {
        let config = Config::default();
        let args = SplitArgs {
            train: Some(0.9),
            ..Default::default()
        };
        assert!(config.partitioner(&args).is_err());
    }
}
