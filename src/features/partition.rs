//! Random train/valid/test splitting of feature tables.
//!
//! Every row lands in exactly one split. With [`PartitionStrategy::Row`] each
//! row is drawn independently, so rows that share a spectrum through sequence
//! fan-out may end up in different splits. [`PartitionStrategy::Spectrum`]
//! draws once per `spec_group_id` instead and sends all of that spectrum's
//! rows to the same split.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{FeatureError, FeatureTable};

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Train/valid/test probabilities, validated to sum to one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitProbabilities {
    train: f64,
    valid: f64,
    test: f64,
}

impl SplitProbabilities {
    /// Validate and build split probabilities.
    ///
    /// Each value must lie in `[0, 1]` and the three must sum to one.
    pub fn new(train: f64, valid: f64, test: f64) -> Result<Self, FeatureError> {
        let invalid = |reason| FeatureError::InvalidProbabilities {
            train,
            valid,
            test,
            reason,
        };
        for p in [train, valid, test] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(invalid("each probability must be within [0, 1]"));
            }
        }
        if ((train + valid + test) - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(invalid("probabilities must sum to 1"));
        }
        Ok(Self { train, valid, test })
    }

    /// Probability of the train split
    pub fn train(&self) -> f64 {
        self.train
    }

    /// Probability of the validation split
    pub fn valid(&self) -> f64 {
        self.valid
    }

    /// Probability of the test split
    pub fn test(&self) -> f64 {
        self.test
    }

    /// Map a uniform draw in `[0, 1)` to a split
    fn select(&self, draw: f64) -> Split {
        if draw < self.train {
            Split::Train
        } else if draw < self.train + self.valid {
            Split::Valid
        } else {
            Split::Test
        }
    }
}

impl Default for SplitProbabilities {
    fn default() -> Self {
        Self {
            train: 0.8,
            valid: 0.1,
            test: 0.1,
        }
    }
}

/// Unit of random assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionStrategy {
    /// Draw independently for every row
    #[default]
    Row,
    /// Draw once per `spec_group_id`
    Spectrum,
}

/// One of the three output splits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    /// Training set
    Train,
    /// Validation set
    Valid,
    /// Test set
    Test,
}

impl Split {
    /// All splits in output order
    pub const ALL: [Split; 3] = [Split::Train, Split::Valid, Split::Test];

    /// File name suffix for this split
    pub fn name(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `features.csv` -> `features_train.csv` etc.
pub fn split_path(features_csv: &Path, split: Split) -> PathBuf {
    let stem = features_csv
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = features_csv
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    features_csv.with_file_name(format!("{}_{}.{}", stem, split.name(), extension))
}

/// Row counts of a partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    /// Rows in the input table
    pub input_rows: usize,
    /// Rows assigned to train
    pub train_rows: usize,
    /// Rows assigned to valid
    pub valid_rows: usize,
    /// Rows assigned to test
    pub test_rows: usize,
}

/// The three disjoint sub-tables of a partitioned feature table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    /// Training rows
    pub train: FeatureTable,
    /// Validation rows
    pub valid: FeatureTable,
    /// Test rows
    pub test: FeatureTable,
}

impl Partition {
    /// The sub-table for a split
    pub fn get(&self, split: Split) -> &FeatureTable {
        match split {
            Split::Train => &self.train,
            Split::Valid => &self.valid,
            Split::Test => &self.test,
        }
    }

    fn get_mut(&mut self, split: Split) -> &mut FeatureTable {
        match split {
            Split::Train => &mut self.train,
            Split::Valid => &mut self.valid,
            Split::Test => &mut self.test,
        }
    }

    /// Row counts
    pub fn stats(&self) -> PartitionStats {
        PartitionStats {
            input_rows: self.train.len() + self.valid.len() + self.test.len(),
            train_rows: self.train.len(),
            valid_rows: self.valid.len(),
            test_rows: self.test.len(),
        }
    }

    /// Write each split next to `features_csv` (see [`split_path`]) and
    /// return the paths written, in train/valid/test order
    pub fn write_alongside(&self, features_csv: &Path) -> Result<Vec<PathBuf>, FeatureError> {
        let mut written = Vec::with_capacity(Split::ALL.len());
        for split in Split::ALL {
            let path = split_path(features_csv, split);
            self.get(split).write_csv(&path)?;
            info!("  {} rows -> {}", self.get(split).len(), path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Randomly splits feature tables
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    probabilities: SplitProbabilities,
    strategy: PartitionStrategy,
    seed: Option<u64>,
}

impl Partitioner {
    /// Create a partitioner with the given probabilities
    pub fn new(probabilities: SplitProbabilities) -> Self {
        Self {
            probabilities,
            ..Default::default()
        }
    }

    /// Set the assignment unit
    pub fn with_strategy(mut self, strategy: PartitionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fix the RNG seed for a reproducible split
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Configured probabilities
    pub fn probabilities(&self) -> &SplitProbabilities {
        &self.probabilities
    }

    /// Configured strategy
    pub fn strategy(&self) -> PartitionStrategy {
        self.strategy
    }

    /// Configured seed
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Split `table` into three disjoint tables covering every row once
    pub fn partition(&self, table: FeatureTable) -> Partition {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.partition_with(table, &mut rng)
    }

    /// Split `table` drawing from a caller-supplied RNG
    pub fn partition_with<R: Rng + ?Sized>(&self, table: FeatureTable, rng: &mut R) -> Partition {
        let mut partition = Partition::default();
        let mut by_spectrum: HashMap<String, Split> = HashMap::new();

        for row in table.into_rows() {
            let split = match self.strategy {
                PartitionStrategy::Row => self.probabilities.select(rng.random::<f64>()),
                PartitionStrategy::Spectrum => match by_spectrum.get(&row.spec_group_id) {
                    Some(split) => *split,
                    None => {
                        let split = self.probabilities.select(rng.random::<f64>());
                        by_spectrum.insert(row.spec_group_id.clone(), split);
                        split
                    }
                },
            };
            partition.get_mut(split).push(row);
        }

        let stats = partition.stats();
        info!(
            "Partitioned {} rows: {} train, {} valid, {} test",
            stats.input_rows, stats.train_rows, stats.valid_rows, stats.test_rows
        );
        partition
    }
}
