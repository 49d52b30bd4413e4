//! Error classification shared by every stage of the pipeline.

use std::fmt;

/// Broad category of a pipeline failure.
///
/// None of these are transient: they all point at input data that needs a
/// human to look at it, so nothing in this crate retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed XML or MGF structure
    Parse,
    /// A referenced identifier could not be resolved
    Lookup,
    /// A required spectrum field is missing or mis-shaped
    Format,
    /// Underlying I/O failure
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Parse => "parse error",
            ErrorKind::Lookup => "lookup error",
            ErrorKind::Format => "format error",
            ErrorKind::Io => "I/O error",
        };
        f.write_str(name)
    }
}
