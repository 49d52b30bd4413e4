use std::path::PathBuf;

use crate::error::ErrorKind;
use crate::features::FeatureError;
use crate::mascot::MascotError;
use crate::mgf::MgfError;

/// Errors that abort a batch run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Spectrum formatting or merging failed
    #[error("MGF error: {0}")]
    MgfError(#[from] MgfError),

    /// Mascot results could not be read
    #[error("Mascot error: {0}")]
    MascotError(#[from] MascotError),

    /// Feature extraction, merging or partitioning failed
    #[error("Feature error: {0}")]
    FeatureError(#[from] FeatureError),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The batch report could not be serialized
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The batch was started with no input files
    #[error("No input MGF files to process")]
    NoInputs,

    /// Annotation is enabled but an input has no Mascot results next to it
    #[error("No Mascot results for {mgf}: expected {expected}")]
    MissingMascotFile {
        /// The MGF input
        mgf: PathBuf,
        /// Where its Mascot XML was looked for
        expected: PathBuf,
    },
}

impl PipelineError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::MgfError(e) => e.kind(),
            PipelineError::MascotError(e) => e.kind(),
            PipelineError::FeatureError(e) => e.kind(),
            PipelineError::IoError(_)
            | PipelineError::JsonError(_)
            | PipelineError::NoInputs
            | PipelineError::MissingMascotFile { .. } => ErrorKind::Io,
        }
    }
}
