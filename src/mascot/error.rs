use crate::error::ErrorKind;

/// Errors that can occur while reading Mascot XML search results
#[derive(Debug, thiserror::Error)]
pub enum MascotError {
    /// Error parsing XML
    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// UTF-8 encoding error in text content
    #[error("UTF-8 encoding error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// A required child element or attribute is absent
    #[error("Missing required {element} in {context}")]
    MissingElement {
        /// Element or attribute name
        element: &'static str,
        /// Where it was expected
        context: String,
    },

    /// `pep_var_mod_pos` does not align with the peptide sequence
    #[error("Malformed modification positions {positions:?} for sequence {sequence}: {reason}")]
    MalformedModificationPositions {
        /// Raw `pep_var_mod_pos` text
        positions: String,
        /// Raw residue sequence
        sequence: String,
        /// What is wrong with it
        reason: String,
    },

    /// A modification digit has no entry in the document's `variable_mods`
    #[error("Unknown modification identifier {identifier:?} in sequence {sequence}")]
    UnknownModification {
        /// The unresolved identifier
        identifier: char,
        /// Raw residue sequence
        sequence: String,
    },
}

impl MascotError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MascotError::IoError(_) => ErrorKind::Io,
            MascotError::UnknownModification { .. } => ErrorKind::Lookup,
            MascotError::XmlError(_)
            | MascotError::Utf8Error(_)
            | MascotError::MissingElement { .. }
            | MascotError::MalformedModificationPositions { .. } => ErrorKind::Parse,
        }
    }
}
