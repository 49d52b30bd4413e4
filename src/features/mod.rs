//! # Features Module
//!
//! The DeepNovo feature table: one row per identified (or unannotated)
//! spectrum, stored as CSV with a fixed column order.
//!
//! ```text
//! spec_group_id,scans,m/z,z,rt_mean,seq,profile,feature area
//! 1042,1042,512.7731,2,1290.44,AC(Carbamidomethyl)DK,0.0:1.0,1.0
//! ```
//!
//! Tables are built per run by [`extract_features`], concatenated across runs
//! by [`merge_features`] and split into train/valid/test sets by
//! [`Partitioner`]. Unlike MGF spectra, feature tables are held fully in
//! memory.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scan::FileIndex;

mod error;
mod extractor;
mod merger;
mod partition;


pub use error::FeatureError;
pub use extractor::{extract_features, extract_from_reader, ExtractStats};
pub use merger::{merge_features, merge_features_into};
pub use partition::{
    split_path, Partition, PartitionStats, PartitionStrategy, Partitioner, Split,
    SplitProbabilities,
};

/// Column headers of a feature table, in file order
pub const FEATURE_COLUMNS: [&str; 8] = [
    "spec_group_id",
    "scans",
    "m/z",
    "z",
    "rt_mean",
    "seq",
    "profile",
    "feature area",
];

/// Placeholder elution profile written for every row
pub const DEFAULT_PROFILE: &str = "0.0:1.0";

/// Placeholder feature area written for every row
pub const DEFAULT_FEATURE_AREA: &str = "1.0";

/// One feature table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Spectrum group; equal to `scans` for single-spectrum features
    pub spec_group_id: String,
    /// Scan identifier
    pub scans: String,
    /// Precursor m/z
    #[serde(rename = "m/z")]
    pub mz: f64,
    /// Precursor charge
    pub z: i32,
    /// Retention time in seconds
    pub rt_mean: f64,
    /// Annotated peptide sequence, empty when unannotated
    pub seq: String,
    /// Elution profile
    pub profile: String,
    /// Feature area
    #[serde(rename = "feature area")]
    pub feature_area: String,
}

impl FeatureRow {
    /// Build a row for one spectrum with the default profile and area
    pub fn new(scan: &str, mz: f64, z: i32, rt_mean: f64, seq: &str) -> Self {
        Self {
            spec_group_id: scan.to_string(),
            scans: scan.to_string(),
            mz,
            z,
            rt_mean,
            seq: seq.to_string(),
            profile: DEFAULT_PROFILE.to_string(),
            feature_area: DEFAULT_FEATURE_AREA.to_string(),
        }
    }

    /// Rewrite `spec_group_id` and `scans` with a source file prefix
    pub fn prefix_scans(&mut self, index: FileIndex) {
        self.spec_group_id = index.prefix_scan(&self.spec_group_id);
        self.scans = index.prefix_scan(&self.scans);
    }

    fn key(&self) -> RowKey {
        (
            self.spec_group_id.clone(),
            self.scans.clone(),
            self.mz.to_bits(),
            self.z,
            self.rt_mean.to_bits(),
            self.seq.clone(),
            self.profile.clone(),
            self.feature_area.clone(),
        )
    }
}

/// Exact identity of a row; floats compare by bit pattern
type RowKey = (String, String, u64, i32, u64, String, String, String);

/// An ordered collection of feature rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing rows
    pub fn from_rows(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    /// Append a row
    pub fn push(&mut self, row: FeatureRow) {
        self.rows.push(row);
    }

    /// Append every row of another table
    pub fn append(&mut self, other: FeatureTable) {
        self.rows.extend(other.rows);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in table order
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Iterate over rows
    pub fn iter(&self) -> std::slice::Iter<'_, FeatureRow> {
        self.rows.iter()
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<FeatureRow> {
        self.rows
    }

    /// Collapse exact duplicate rows, keeping the first occurrence.
    ///
    /// Returns the number of rows removed.
    pub fn dedup(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<RowKey> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.key()));
        before - self.rows.len()
    }

    /// Prefix every row's scan columns with a source file index
    pub fn prefix_scans(&mut self, index: FileIndex) {
        for row in &mut self.rows {
            row.prefix_scans(index);
        }
    }

    /// Read a feature table from a CSV file
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, FeatureError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a feature table from CSV text with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FeatureError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let rows = csv_reader
            .deserialize()
            .collect::<Result<Vec<FeatureRow>, _>>()?;
        Ok(Self { rows })
    }

    /// Write the table as CSV, creating or truncating `path`
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), FeatureError> {
        let file = File::create(path)?;
        self.to_writer(file)
    }

    /// Write the table as CSV. The header row is written even when the table
    /// is empty.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), FeatureError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(FEATURE_COLUMNS)?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a FeatureRow;
    type IntoIter = std::slice::Iter<'a, FeatureRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<FeatureRow> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = FeatureRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
