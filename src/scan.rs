//! Scan identifier renumbering shared by the spectrum and feature mergers.
//!
//! Scan identifiers are only unique within the run they were acquired in. When
//! several runs are merged into one corpus every identifier is rewritten to
//! `F<index>:<scan>`, where `index` is the 0-based position of the source file
//! in the merge input list. Both [`crate::mgf::merge_mgf`] and
//! [`crate::features::merge_features`] go through this module so the spectra
//! and the feature rows stay joinable.

use std::fmt;

/// Position of a source file in an ordered merge input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileIndex(pub usize);

impl FileIndex {
    /// Prefix a raw scan identifier with this file index.
    pub fn prefix_scan(&self, scan: &str) -> String {
        format!("F{}:{}", self.0, scan)
    }
}

impl fmt::Display for FileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Split a merged scan identifier back into its file index and raw scan.
///
/// Returns `None` for identifiers that were never prefixed.
pub fn split_prefixed_scan(scan: &str) -> Option<(FileIndex, &str)> {
    let rest = scan.strip_prefix('F')?;
    let (index, raw) = rest.split_once(':')?;
    let index = index.parse().ok()?;
    Some((FileIndex(index), raw))
}
