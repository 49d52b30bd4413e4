//! # mznovo - De Novo Sequencing Training Data from MGF and Mascot Results
//!
//! `mznovo` turns per-run MGF spectrum files and their Mascot XML search
//! results into the inputs a DeepNovo-style peptide sequencing model trains
//! on: one merged spectrum file, one feature table and train/valid/test
//! splits of that table.
//!
//! ## Key Features
//!
//! - **Streaming MGF handling**: spectra are read and written one at a time,
//!   so formatting a run never holds more than one spectrum in memory.
//!
//! - **Globally unique scans**: merging rewrites every scan identifier to
//!   `F<index>:<scan>`, in both the spectra and the feature table, using the
//!   same file order so the two stay joinable.
//!
//! - **Modified sequences**: rank-1 Mascot peptides are rebuilt with their
//!   variable modifications inline, e.g. `AC(Carbamidomethyl)DK`.
//!
//! - **Leak-free splits on request**: partitioning can draw per row or per
//!   spectrum, with an optional fixed seed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mznovo::pipeline::{discover_inputs, Pipeline, PipelineConfig};
//!
//! let inputs = discover_inputs("smbp_data", ".dat.mgf")?;
//! let config = PipelineConfig {
//!     dataset_name: "smbp".to_string(),
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let report = Pipeline::new(config).run(&inputs, "out".as_ref())?;
//! println!("{} feature rows", report.feature_rows);
//! # Ok::<(), mznovo::pipeline::PipelineError>(())
//! ```
//!
//! ## Individual Stages
//!
//! ```rust,no_run
//! use mznovo::features::{extract_features, Partitioner};
//! use mznovo::mascot::parse_mascot_xml;
//! use mznovo::mgf::format_mgf;
//!
//! format_mgf("run1.dat.mgf", "run1_formatted.mgf")?;
//! let mascot = parse_mascot_xml("run1.dat.xml")?;
//! let (table, _stats) = extract_features("run1_formatted.mgf", Some(&mascot))?;
//! let partition = Partitioner::default().with_seed(Some(7)).partition(table);
//! partition.write_alongside("features_run1.csv".as_ref())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`mgf`]: MGF reader/writer, spectrum formatting and merging
//! - [`mascot`]: Mascot XML parsing and modified sequence reconstruction
//! - [`features`]: feature table extraction, merging and partitioning
//! - [`annotate`]: MGF export with `SEQ=` annotations
//! - [`pipeline`]: the batch driver tying the stages together
//! - [`scan`]: the `F<index>:` scan prefix shared by both mergers
//!
//! ## Feature Table
//!
//! | Column | Description |
//! |--------|-------------|
//! | spec_group_id | Scan identifier (prefixed once merged) |
//! | scans | Scan identifier (prefixed once merged) |
//! | m/z | Precursor m/z, first `PEPMASS` value |
//! | z | First precursor charge |
//! | rt_mean | `RTINSECONDS` |
//! | seq | Annotated sequence, empty when unannotated |
//! | profile | Always `0.0:1.0` |
//! | feature area | Always `1.0` |

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod annotate;
pub mod error;
pub mod features;
pub mod mascot;
pub mod mgf;
pub mod pipeline;
pub mod scan;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::annotate::{annotate_mgf, AnnotateStats};
    pub use crate::error::ErrorKind;
    pub use crate::features::{
        extract_features, merge_features, ExtractStats, FeatureError, FeatureRow, FeatureTable,
        Partition, PartitionStrategy, Partitioner, SplitProbabilities,
    };
    pub use crate::mascot::{parse_mascot_xml, MascotError, MascotResults, ModificationTable};
    pub use crate::mgf::{
        format_mgf, merge_mgf, FormatStats, MergeStats, MgfError, MgfReader, MgfSpectrum,
        MgfWriter, Peak,
    };
    pub use crate::pipeline::{
        discover_inputs, BatchReport, Pipeline, PipelineConfig, PipelineError,
    };
    pub use crate::scan::FileIndex;
}
