use crate::error::ErrorKind;

/// Errors that can occur while reading, writing or interpreting MGF files
#[derive(Debug, thiserror::Error)]
pub enum MgfError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A line inside a spectrum block is neither a parameter nor a peak
    #[error("Malformed header line {line_number}: {line:?}")]
    MalformedHeaderLine {
        /// 1-based line number in the source
        line_number: usize,
        /// Offending line content
        line: String,
    },

    /// A peak line did not contain a parseable m/z and intensity
    #[error("Malformed peak line {line_number}: {line:?}")]
    MalformedPeakLine {
        /// 1-based line number in the source
        line_number: usize,
        /// Offending line content
        line: String,
    },

    /// The file ended inside a `BEGIN IONS` block
    #[error("Spectrum starting at line {line_number} is missing END IONS")]
    UnterminatedSpectrum {
        /// Line number of the opening `BEGIN IONS`
        line_number: usize,
    },

    /// A parameter required by the caller is absent
    #[error("Spectrum {spectrum} is missing required parameter {parameter}")]
    MissingParameter {
        /// Title or scan of the spectrum, for diagnostics
        spectrum: String,
        /// Lower-case parameter name
        parameter: &'static str,
    },

    /// A parameter is present but cannot be interpreted
    #[error("Spectrum {spectrum} has invalid {parameter} value {value:?}")]
    InvalidParameter {
        /// Title or scan of the spectrum, for diagnostics
        spectrum: String,
        /// Lower-case parameter name
        parameter: &'static str,
        /// Raw parameter value
        value: String,
    },
}

impl MgfError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MgfError::IoError(_) => ErrorKind::Io,
            MgfError::MalformedHeaderLine { .. }
            | MgfError::MalformedPeakLine { .. }
            | MgfError::UnterminatedSpectrum { .. } => ErrorKind::Parse,
            MgfError::MissingParameter { .. } | MgfError::InvalidParameter { .. } => {
                ErrorKind::Format
            }
        }
    }
}
