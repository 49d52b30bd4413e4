use crate::error::ErrorKind;
use crate::mascot::MascotError;
use crate::mgf::MgfError;

/// Errors that can occur while building, reading or splitting feature tables
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error reading the source spectra
    #[error("MGF error: {0}")]
    MgfError(#[from] MgfError),

    /// Error reading the Mascot identifications
    #[error("Mascot error: {0}")]
    MascotError(#[from] MascotError),

    /// Split probabilities are out of range or do not sum to one
    #[error("Invalid split probabilities [{train}, {valid}, {test}]: {reason}")]
    InvalidProbabilities {
        /// Train probability
        train: f64,
        /// Validation probability
        valid: f64,
        /// Test probability
        test: f64,
        /// What is wrong with them
        reason: &'static str,
    },
}

impl FeatureError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeatureError::IoError(_) => ErrorKind::Io,
            FeatureError::CsvError(e) if e.is_io_error() => ErrorKind::Io,
            FeatureError::CsvError(_) => ErrorKind::Parse,
            FeatureError::MgfError(e) => e.kind(),
            FeatureError::MascotError(e) => e.kind(),
            FeatureError::InvalidProbabilities { .. } => ErrorKind::Format,
        }
    }
}
